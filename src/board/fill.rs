//! Zone fill collaborator
//!
//! The engine only needs to drop a stale fill and ask for a new one. The
//! default engine triangulates the zone outline with earcut; a host can
//! plug in its own filler.

use crate::board::geometry::{Point, MIN_CONTOUR_CORNERS};
use crate::board::zones::{Zone, ZoneFill};

pub trait FillEngine: Send + Sync {
    fn invalidate_fill(&self, zone: &mut Zone);
    fn rebuild_fill(&self, zone: &mut Zone);
}

/// Earcut triangulation of the smoothed outline, holes included
#[derive(Debug, Clone, Copy)]
pub struct TessellatedFill {
    /// Arc resolution used when smoothing filleted corners
    pub fillet_segments: u32,
}

impl Default for TessellatedFill {
    fn default() -> Self {
        Self { fillet_segments: 32 }
    }
}

impl FillEngine for TessellatedFill {
    fn invalidate_fill(&self, zone: &mut Zone) {
        zone.fill = None;
    }

    fn rebuild_fill(&self, zone: &mut Zone) {
        let outline = zone.smoothed_outline(self.fillet_segments);
        zone.fill = Some(tessellate(outline.outer(), outline.holes()));
    }
}

/// Triangulate an outer ring plus holes.
/// Returns flat `[x, y]` vertices and triangle indices.
pub fn tessellate(outer: &[Point], holes: &[Vec<Point>]) -> ZoneFill {
    if outer.len() < MIN_CONTOUR_CORNERS {
        return ZoneFill::default();
    }

    // Build flat coordinate array for earcut
    let mut flat_coords: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();

    for p in outer {
        flat_coords.push(p.x as f64);
        flat_coords.push(p.y as f64);
    }

    for hole in holes {
        if hole.len() < MIN_CONTOUR_CORNERS {
            continue; // Skip degenerate holes
        }
        hole_indices.push(flat_coords.len() / 2);
        for p in hole {
            flat_coords.push(p.x as f64);
            flat_coords.push(p.y as f64);
        }
    }

    let indices = match earcutr::earcut(&flat_coords, &hole_indices, 2) {
        Ok(indices) => indices,
        Err(e) => {
            log::warn!("[Fill] Triangulation failed: {:?}", e);
            Vec::new()
        }
    };

    ZoneFill {
        vertices: flat_coords.iter().map(|&v| v as f32).collect(),
        indices: indices.iter().map(|&i| i as u32).collect(),
    }
}
