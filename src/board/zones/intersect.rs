//! Zone intersection tester
//!
//! Two zones intersect when any edges share a point, or when one outline has
//! a corner inside the other (full containment crosses no edge).

use crate::board::geometry::{segments_intersect, PolygonOutline};

use super::collection::ZoneBoard;
use super::types::{can_merge, Zone, ZoneId};

/// Geometric intersection of two outlines, holes included
pub fn outlines_intersect(a: &PolygonOutline, b: &PolygonOutline) -> bool {
    let (Some(box_a), Some(box_b)) = (a.bounding_box(), b.bounding_box()) else {
        return false;
    };
    if !box_a.overlaps(&box_b) {
        return false;
    }

    for (a1, a2) in a.edges() {
        for (b1, b2) in b.edges() {
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }

    // No crossing edges: intersect only if one lies inside the other
    b.contours().iter().flatten().any(|p| a.point_inside(*p))
        || a.contours().iter().flatten().any(|p| b.point_inside(*p))
}

/// Zones on the same layer whose outlines intersect
pub fn intersects(a: &Zone, b: &Zone) -> bool {
    a.layer() == b.layer() && outlines_intersect(&a.outline, &b.outline)
}

impl ZoneBoard {
    /// True when the zone intersects any other zone it could be merged with
    pub fn intersects_any(&self, id: ZoneId) -> bool {
        let Some(zone) = self.get(id) else {
            return false;
        };
        self.iter()
            .filter(|other| other.id != id && can_merge(&zone.settings, &other.settings))
            .any(|other| intersects(zone, other))
    }
}
