//! Zone edit boundary
//!
//! User-drawn contours are validated here before they reach the board. A
//! rejected edit leaves the board untouched.

use serde::{Deserialize, Serialize};

use crate::board::geometry::{
    dedup_contour, CornerSmoothing, Point, PolygonOutline, MIN_CONTOUR_CORNERS,
};
use crate::error::{Result, ZoneError};

use super::changes::ChangeSink;
use super::collection::ZoneBoard;
use super::engine::{ReconcileReport, ZoneEngine};
use super::types::{LayerId, ZoneId, ZoneSettings};

/// A zone creation or outline edit request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneEditRequest {
    /// Zone to edit; a new zone is created when absent
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    pub outline: Vec<Point>,
    #[serde(default)]
    pub holes: Vec<Vec<Point>>,
    pub net: i32,
    pub layer: LayerId,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub keepout: bool,
    /// Falls back to the engine's default clearance
    #[serde(default)]
    pub clearance: Option<i64>,
    #[serde(default)]
    pub smoothing: CornerSmoothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub zone_id: ZoneId,
    pub report: ReconcileReport,
}

/// Number of distinct corners once repeated corners are collapsed
fn distinct_corners(contour: &[Point]) -> usize {
    let mut cleaned = contour.to_vec();
    dedup_contour(&mut cleaned);
    cleaned.len()
}

/// Reject the first corner outside the supported coordinate range
pub fn check_coordinates<'a>(points: impl IntoIterator<Item = &'a Point>) -> Result<()> {
    match points.into_iter().find(|p| !p.in_range()) {
        Some(p) => Err(ZoneError::CoordinateOutOfRange { x: p.x, y: p.y }),
        None => Ok(()),
    }
}

/// Check a request without touching the board
pub fn validate_edit(request: &ZoneEditRequest) -> Result<()> {
    let count = distinct_corners(&request.outline);
    if count < MIN_CONTOUR_CORNERS {
        return Err(ZoneError::TooFewCorners { count });
    }
    for hole in &request.holes {
        let count = distinct_corners(hole);
        if count < MIN_CONTOUR_CORNERS {
            return Err(ZoneError::TooFewCorners { count });
        }
    }
    check_coordinates(request.outline.iter().chain(request.holes.iter().flatten()))?;
    if matches!(request.clearance, Some(c) if c < 0) {
        return Err(ZoneError::InvalidSettings(format!(
            "negative clearance {}",
            request.clearance.unwrap_or_default()
        )));
    }
    match request.smoothing {
        CornerSmoothing::Chamfer { distance } if distance < 0 => {
            Err(ZoneError::InvalidSettings(format!("negative chamfer distance {}", distance)))
        }
        CornerSmoothing::Fillet { radius } if radius < 0 => {
            Err(ZoneError::InvalidSettings(format!("negative fillet radius {}", radius)))
        }
        _ => Ok(()),
    }
}

impl ZoneEngine {
    /// Apply a user edit, then normalize and reconcile the zone's net.
    ///
    /// The returned id is the edited or created zone; it may no longer be on
    /// the board if the edit merged it into an earlier zone.
    pub fn apply_edit(
        &self,
        board: &mut ZoneBoard,
        request: &ZoneEditRequest,
        changes: &mut dyn ChangeSink,
    ) -> Result<EditOutcome> {
        validate_edit(request)?;

        let settings = ZoneSettings {
            net: request.net,
            layer: request.layer,
            priority: request.priority,
            keepout: request.keepout,
            clearance: request.clearance.unwrap_or(self.config().default_clearance),
            smoothing: request.smoothing,
        };
        let outline = PolygonOutline::with_holes(request.outline.clone(), request.holes.clone());

        let zone_id = match request.zone_id {
            Some(id) => {
                let zone = board.get_mut(id).ok_or(ZoneError::UnknownZone(id))?;
                zone.settings = settings;
                zone.outline = outline;
                self.fill_engine().invalidate_fill(zone);
                id
            }
            None => {
                let id = board.insert(settings, outline);
                changes.item_added(id);
                id
            }
        };

        let report = self.on_zone_modified(board, zone_id, changes)?;
        Ok(EditOutcome { zone_id, report })
    }
}
