//! Zone area combiner
//!
//! Merges two intersecting, merge-eligible zones into the first one. The
//! union normally comes back as one polygon with holes. Two pieces happen
//! when the zones only share a corner; that is a benign non-merge. More than
//! two pieces is an anomaly and is logged as an error.

use crate::board::fill::FillEngine;
use crate::board::geometry::{PolygonOutline, SetOperations};
use crate::error::{Result, ZoneError};

use super::changes::ChangeSink;
use super::collection::ZoneBoard;
use super::normalize::normalize;
use super::types::{Zone, ZoneId};

/// Union pieces in normalized form. A pinched ring, e.g. two zones meeting
/// at one corner, counts as the separate pieces it is made of.
fn union_pieces(
    a: &PolygonOutline,
    b: &PolygonOutline,
    set_ops: &dyn SetOperations,
    max_split_steps: usize,
) -> Vec<PolygonOutline> {
    set_ops
        .union(a, b)
        .iter()
        .flat_map(|piece| normalize(piece, max_split_steps))
        .collect()
}

/// Replace `zone_ref`'s outline with its union with `zone_other`.
///
/// Returns false and leaves `zone_ref` untouched unless the union is a single
/// polygon with holes. The caller removes `zone_other` on success.
pub fn combine_areas(
    zone_ref: &mut Zone,
    zone_other: &Zone,
    set_ops: &dyn SetOperations,
    fill: &dyn FillEngine,
    max_split_steps: usize,
) -> bool {
    let mut merged = union_pieces(
        &zone_ref.outline,
        &zone_other.outline,
        set_ops,
        max_split_steps,
    );

    if merged.len() > 2 {
        log::error!(
            "[Combine] Union of zones {} and {} gave {} polygons",
            zone_ref.id,
            zone_other.id,
            merged.len()
        );
        return false;
    }
    if merged.len() > 1 {
        log::warn!(
            "[Combine] Zones {} and {} only touch, not merging",
            zone_ref.id,
            zone_other.id
        );
        return false;
    }

    let Some(outline) = merged.pop() else {
        log::error!(
            "[Combine] Union of zones {} and {} is empty",
            zone_ref.id,
            zone_other.id
        );
        return false;
    };

    zone_ref.outline = outline;
    zone_ref.set_modified(true);
    fill.invalidate_fill(zone_ref);
    true
}

/// Merge `other_id` into `ref_id` on the board, removing `other_id` on success
/// and reporting its deletion.
pub fn combine_zones(
    board: &mut ZoneBoard,
    ref_id: ZoneId,
    other_id: ZoneId,
    set_ops: &dyn SetOperations,
    fill: &dyn FillEngine,
    max_split_steps: usize,
    changes: &mut dyn ChangeSink,
) -> Result<bool> {
    if ref_id == other_id {
        return Err(ZoneError::SelfCombine(ref_id));
    }
    let other = board.zone(other_id)?.clone();
    let zone_ref = board.get_mut(ref_id).ok_or(ZoneError::UnknownZone(ref_id))?;

    if !combine_areas(zone_ref, &other, set_ops, fill, max_split_steps) {
        return Ok(false);
    }

    log::debug!("[Combine] Merged zone {} into zone {}", other_id, ref_id);
    if let Some(removed) = board.remove(other_id) {
        changes.item_deleted(removed);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fill::TessellatedFill;
    use crate::board::geometry::{GeoSetOperations, Point};
    use crate::board::zones::changes::ZoneChange;
    use crate::board::zones::types::{LayerId, ZoneSettings};

    fn board_with(outlines: Vec<PolygonOutline>) -> (ZoneBoard, Vec<ZoneId>) {
        let mut board = ZoneBoard::new();
        let ids = outlines
            .into_iter()
            .map(|o| board.insert(ZoneSettings::new(1, LayerId(0)), o))
            .collect();
        (board, ids)
    }

    fn combine(
        board: &mut ZoneBoard,
        a: ZoneId,
        b: ZoneId,
        changes: &mut Vec<ZoneChange>,
    ) -> Result<bool> {
        let fill = TessellatedFill::default();
        combine_zones(board, a, b, &GeoSetOperations, &fill, 10_000, changes)
    }

    #[test]
    fn test_overlapping_zones_merge() {
        let (mut board, ids) = board_with(vec![
            PolygonOutline::rectangle(0, 0, 100, 100),
            PolygonOutline::rectangle(50, 0, 150, 100),
        ]);
        let mut changes: Vec<ZoneChange> = Vec::new();
        let merged = combine(&mut board, ids[0], ids[1], &mut changes);

        assert_eq!(merged, Ok(true));
        assert_eq!(board.len(), 1);
        let zone = board.get(ids[0]).unwrap();
        assert!(zone.is_modified());
        assert_eq!(zone.outline.area(), 15000.0);
        assert!(matches!(changes.as_slice(), [ZoneChange::Deleted(z)] if z.id == ids[1]));
    }

    #[test]
    fn test_corner_touch_is_not_merged() {
        let (mut board, ids) = board_with(vec![
            PolygonOutline::rectangle(0, 0, 100, 100),
            PolygonOutline::rectangle(100, 100, 200, 200),
        ]);
        let before = board.get(ids[0]).unwrap().outline.clone();
        let mut changes: Vec<ZoneChange> = Vec::new();
        let merged = combine(&mut board, ids[0], ids[1], &mut changes);

        assert_eq!(merged, Ok(false));
        assert_eq!(board.len(), 2);
        assert_eq!(board.get(ids[0]).unwrap().outline, before);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_union_enclosing_pinched_hole_merges() {
        let p = Point::new;
        // U with arms 0..30 and 70..100, closed off by a triangle that
        // overlaps the left arm and only touches the right arm's corner
        let u_shape = PolygonOutline::new(vec![
            p(0, 0),
            p(100, 0),
            p(100, 100),
            p(70, 100),
            p(70, 30),
            p(30, 30),
            p(30, 100),
            p(0, 100),
        ]);
        let lid = PolygonOutline::new(vec![p(0, 80), p(70, 100), p(0, 120)]);
        let (mut board, ids) = board_with(vec![u_shape, lid]);
        let mut changes: Vec<ZoneChange> = Vec::new();

        assert_eq!(combine(&mut board, ids[0], ids[1], &mut changes), Ok(true));
        assert_eq!(board.len(), 1);
        let zone = board.get(ids[0]).unwrap();
        assert!(zone.outline.is_weakly_simple());
        // The enclosed pocket is not copper
        assert!(!zone.outline.point_inside(p(50, 50)));
        assert!(zone.outline.point_inside(p(10, 110)));
    }

    #[test]
    fn test_self_combine_is_an_error() {
        let (mut board, ids) = board_with(vec![PolygonOutline::rectangle(0, 0, 10, 10)]);
        let mut changes: Vec<ZoneChange> = Vec::new();
        let result = combine(&mut board, ids[0], ids[0], &mut changes);
        assert_eq!(result, Err(ZoneError::SelfCombine(ids[0])));
    }
}
