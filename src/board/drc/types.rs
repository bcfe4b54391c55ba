//! DRC data types
//!
//! Contains the violation record, the raw edge hit it is fused from, and the
//! sink violations are reported to.

use serde::{Deserialize, Serialize};

use crate::board::geometry::{BoundingBox, Point};
use crate::board::zones::{LayerId, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A corner of one zone lies inside a foreign zone
    CornerInsideZone,
    /// Edges of two foreign zones are closer than the clearance, or cross
    ZonesTooClose,
}

/// A zone-to-zone clearance violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrcViolation {
    pub kind: ViolationKind,
    /// Marker position: the offending corner, or the closest approach
    pub location: Point,
    /// Zone the marker belongs to
    pub zone_a: ZoneId,
    /// The foreign zone
    pub zone_b: ZoneId,
    pub layer: LayerId,
    pub net_a: i32,
    pub net_b: i32,
    /// Smallest edge distance found (0 for corners inside)
    pub distance: f64,
    /// Effective clearance between the two zones
    pub clearance: i64,
    /// Raw edge pairs fused into this record
    pub edge_hits: usize,
    /// Bounds of all hit locations, for fit-to-violation
    pub bounds: BoundingBox,
}

/// One violating edge pair (internal, before fusion)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub distance: f64,
    pub location: Point,
}

/// Receiver of DRC violations
pub trait ViolationSink {
    fn report_violation(&mut self, violation: DrcViolation);
}

impl ViolationSink for Vec<DrcViolation> {
    fn report_violation(&mut self, violation: DrcViolation) {
        self.push(violation);
    }
}
