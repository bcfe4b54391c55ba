//! Error types for zone edits and lookups.

use thiserror::Error;

use crate::board::zones::ZoneId;

/// Errors surfaced to callers of the zone engine.
///
/// Geometry repair never fails; degenerate zones are deleted and logged
/// instead. These errors only come from request boundaries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneError {
    /// An edited contour has fewer than three distinct corners.
    #[error("contour has {count} distinct corners, at least 3 are required")]
    TooFewCorners { count: usize },

    /// No zone with this id is on the board.
    #[error("unknown zone {0}")]
    UnknownZone(ZoneId),

    /// Zone settings cannot be applied.
    #[error("invalid zone settings: {0}")]
    InvalidSettings(String),

    /// A corner index past the end of a zone outline.
    #[error("zone {zone} has no corner {index}")]
    CornerOutOfRange { zone: ZoneId, index: usize },

    /// Two zones in one load share an id.
    #[error("duplicate zone id {0}")]
    DuplicateZone(ZoneId),

    /// A coordinate lies outside the supported board range.
    #[error("coordinate ({x}, {y}) is out of range")]
    CoordinateOutOfRange { x: i64, y: i64 },

    /// A zone was asked to combine with itself.
    #[error("zone {0} cannot be combined with itself")]
    SelfCombine(ZoneId),
}

pub type Result<T> = std::result::Result<T, ZoneError>;
