//! Handler module declarations and re-exports

pub mod config;
pub mod drc;
pub mod zones;

pub use config::*;
pub use drc::*;
pub use zones::*;

use crate::error::ZoneError;
use crate::lsp::protocol::{error_codes, Response};

/// Map an engine error onto the matching JSON-RPC error code
pub(crate) fn zone_error_response(id: Option<serde_json::Value>, error: ZoneError) -> Response {
    let code = match error {
        ZoneError::UnknownZone(_) => error_codes::UNKNOWN_ZONE,
        ZoneError::TooFewCorners { .. }
        | ZoneError::InvalidSettings(_)
        | ZoneError::CoordinateOutOfRange { .. } => error_codes::EDIT_REJECTED,
        ZoneError::CornerOutOfRange { .. } | ZoneError::DuplicateZone(_) => {
            error_codes::INVALID_PARAMS
        }
        ZoneError::SelfCombine(_) => error_codes::INTERNAL_ERROR,
    };
    Response::error(id, code, error.to_string())
}
