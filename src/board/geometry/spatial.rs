//! R-tree index over outline bounding boxes
//!
//! Entries carry their position in the board's zone order, so query results
//! can be sorted back into deterministic scan order.

use rstar::{RTree, RTreeObject, AABB};

use super::types::BoundingBox;

/// Object wrapper for R-tree spatial indexing
#[derive(Clone, Debug)]
pub struct IndexedBounds {
    pub index: usize,
    pub bounds: AABB<[i64; 2]>,
}

impl IndexedBounds {
    pub fn new(index: usize, bbox: &BoundingBox) -> Self {
        let bounds = AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y]);
        Self { index, bounds }
    }
}

impl RTreeObject for IndexedBounds {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

/// Bulk-load an index from `(position, bounds)` pairs
pub fn build_index<I>(entries: I) -> RTree<IndexedBounds>
where
    I: IntoIterator<Item = (usize, BoundingBox)>,
{
    let objects: Vec<IndexedBounds> = entries
        .into_iter()
        .map(|(index, bbox)| IndexedBounds::new(index, &bbox))
        .collect();
    RTree::bulk_load(objects)
}

/// Positions of every entry whose box touches `bbox`, ascending
pub fn query_overlapping(tree: &RTree<IndexedBounds>, bbox: &BoundingBox) -> Vec<usize> {
    let search_bounds = AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y]);
    let mut hits: Vec<usize> = tree
        .locate_in_envelope_intersecting(&search_bounds)
        .map(|obj| obj.index)
        .collect();
    hits.sort_unstable();
    hits
}
