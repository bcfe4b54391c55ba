//! Zone pair clearance checking
//!
//! Contains the pair filter, the effective clearance rule, and the core
//! corner/edge checks between two zone outlines.

use crate::board::geometry::{clearance_between_segments, BoundingBox, Point, PolygonOutline};
use crate::board::zones::{Zone, ZoneBoard, ZoneId};
use crate::error::{Result, ZoneError};

use super::types::{DrcViolation, EdgeHit, ViolationKind};

/// Keepouts carry no clearance; the minimal positive value is used instead
pub const KEEPOUT_CLEARANCE: i64 = 1;

/// Check if two zones should be DRC-checked against each other
pub fn should_check_pair(a: &Zone, b: &Zone) -> bool {
    if a.id == b.id {
        return false;
    }

    // Different layers - skip
    if a.layer() != b.layer() {
        return false;
    }

    // Same net - skip, unless the net is undefined
    if a.net() == b.net() && a.net() >= 0 {
        return false;
    }

    if a.settings.priority != b.settings.priority {
        return false;
    }

    if a.is_keepout() != b.is_keepout() {
        return false;
    }

    a.layer().is_copper() && b.layer().is_copper()
}

/// Larger of the two clearances, or the keepout minimum
pub fn effective_clearance(a: &Zone, b: &Zone) -> i64 {
    if a.is_keepout() || b.is_keepout() {
        return KEEPOUT_CLEARANCE;
    }
    a.settings.clearance.max(b.settings.clearance)
}

fn corner_violation(owner: &Zone, foreign: &Zone, corner: Point, clearance: i64) -> DrcViolation {
    DrcViolation {
        kind: ViolationKind::CornerInsideZone,
        location: corner,
        zone_a: owner.id,
        zone_b: foreign.id,
        layer: owner.layer(),
        net_a: owner.net(),
        net_b: foreign.net(),
        distance: 0.0,
        clearance,
        edge_hits: 0,
        bounds: BoundingBox::from_point(corner),
    }
}

/// Every edge pair closer than `clearance`
pub fn collect_edge_hits(a: &PolygonOutline, b: &PolygonOutline, clearance: i64) -> Vec<EdgeHit> {
    let mut hits = Vec::new();
    for (a1, a2) in a.edges() {
        for (b1, b2) in b.edges() {
            let c = clearance_between_segments(b1, b2, 0, a1, a2, 0, clearance);
            if c.distance < clearance as f64 {
                hits.push(EdgeHit {
                    distance: c.distance,
                    location: c.nearest,
                });
            }
        }
    }
    hits
}

/// Fuse all edge hits of one zone pair into a single record.
/// The record keeps the closest hit's location and the bounds of all hits.
pub fn fuse_edge_hits(
    a: &Zone,
    b: &Zone,
    hits: &[EdgeHit],
    clearance: i64,
) -> Option<DrcViolation> {
    let first = hits.first()?;
    let mut closest = *first;
    let mut bounds = BoundingBox::from_point(first.location);

    for hit in &hits[1..] {
        bounds.include(hit.location);
        if hit.distance < closest.distance {
            closest = *hit;
        }
    }

    Some(DrcViolation {
        kind: ViolationKind::ZonesTooClose,
        location: closest.location,
        zone_a: a.id,
        zone_b: b.id,
        layer: a.layer(),
        net_a: a.net(),
        net_b: b.net(),
        distance: closest.distance,
        clearance,
        edge_hits: hits.len(),
        bounds,
    })
}

/// Check one zone pair using precomputed (smoothed) outlines.
///
/// Reports each corner of A inside B, then each corner of B inside A, then
/// one fused record for edges that are too close.
pub fn check_zone_pair(
    a: &Zone,
    outline_a: &PolygonOutline,
    b: &Zone,
    outline_b: &PolygonOutline,
) -> Vec<DrcViolation> {
    let clearance = effective_clearance(a, b);
    let mut violations = Vec::new();

    for corner in outline_a.contours().iter().flatten() {
        if outline_b.point_inside(*corner) {
            violations.push(corner_violation(a, b, *corner, clearance));
        }
    }

    for corner in outline_b.contours().iter().flatten() {
        if outline_a.point_inside(*corner) {
            violations.push(corner_violation(b, a, *corner, clearance));
        }
    }

    let hits = collect_edge_hits(outline_a, outline_b, clearance);
    if let Some(v) = fuse_edge_hits(a, b, &hits, clearance) {
        violations.push(v);
    }

    violations
}

/// Check a single outline edge, the one starting at `corner_index`, against
/// every foreign zone.
///
/// Returns the first problem found: the edge's end corner inside a foreign
/// zone, or the edge too close to a foreign edge. Meant for live feedback
/// while an outline is being drawn, so it works on the raw outline.
pub fn check_zone_edge(
    board: &ZoneBoard,
    zone_id: ZoneId,
    corner_index: usize,
) -> Result<Option<DrcViolation>> {
    let zone = board.zone(zone_id)?;
    let (start, end) = zone
        .outline
        .edge_at(corner_index)
        .ok_or(ZoneError::CornerOutOfRange {
            zone: zone_id,
            index: corner_index,
        })?;

    if !zone.layer().is_copper() {
        return Ok(None);
    }

    for other in board.iter() {
        if !should_check_pair(zone, other) {
            continue;
        }
        let clearance = effective_clearance(zone, other);

        if other.outline.point_inside(end) {
            return Ok(Some(corner_violation(zone, other, end, clearance)));
        }

        for (b1, b2) in other.outline.edges() {
            let c = clearance_between_segments(b1, b2, 0, start, end, 0, clearance);
            if c.distance < clearance as f64 {
                let hit = EdgeHit {
                    distance: c.distance,
                    location: c.nearest,
                };
                return Ok(fuse_edge_hits(zone, other, &[hit], clearance));
            }
        }
    }

    Ok(None)
}
