//! Geometry for zone outlines
//!
//! # Submodules
//! - `types` - Points and bounding boxes
//! - `segments` - Segment intersection and clearance primitives
//! - `outline` - Polygon outline with holes
//! - `smoothing` - Chamfer and fillet corner smoothing
//! - `boolean` - Polygon union through a pluggable set-operation backend
//! - `spatial` - R-tree index over bounding boxes

mod types;
mod segments;
mod outline;
mod smoothing;
mod boolean;
mod spatial;

pub use types::{BoundingBox, Point, COORD_LIMIT};

pub use segments::{
    clearance_between_segments,
    orientation,
    point_on_segment,
    point_segment_distance,
    segment_contact_point,
    segments_cross,
    segments_intersect,
    SegmentClearance,
};

pub use outline::{
    contour_area2,
    contour_edges,
    contour_is_simple,
    dedup_contour,
    point_in_contour,
    point_on_contour,
    PolygonOutline,
    MIN_CONTOUR_CORNERS,
};

pub use smoothing::CornerSmoothing;

pub use boolean::{difference, GeoSetOperations, SetOperations};

pub use spatial::{build_index, query_overlapping, IndexedBounds};
