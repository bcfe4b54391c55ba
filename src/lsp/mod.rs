//! Zone server module - line-delimited JSON-RPC front end for the zone engine
//!
//! Stands in for the editor host: it loads a board, applies zone edits, and
//! runs zone DRC on request.
//!
//! # Module Structure
//! - `protocol` - JSON-RPC request/response types
//! - `state` - Server state management
//! - `handlers` - Request handlers organized by functionality

pub mod handlers;
pub mod protocol;
pub mod state;

pub use protocol::{error_codes, ErrorResponse, Request, Response};
pub use state::ServerState;

use handlers::*;

/// Route one request to its handler
pub fn dispatch(state: &mut ServerState, request: Request) -> Response {
    match request.method.as_str() {
        "Load" => handle_load(state, request.id, request.params),
        "EditZone" => handle_edit_zone(state, request.id, request.params),
        "DeleteZone" => handle_delete_zone(state, request.id, request.params),
        "GetZones" => handle_get_zones(state, request.id),
        "GetChanges" => handle_get_changes(state, request.id),
        "RunDRC" => handle_run_drc(state, request.id, request.params),
        "GetDRCViolations" => handle_get_drc_violations(state, request.id),
        "CheckZoneEdge" => handle_check_zone_edge(state, request.id, request.params),
        "Configure" => handle_configure(state, request.id, request.params),
        "Close" => handle_close(state, request.id),
        _ => Response::error(
            request.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}
