//! Zone handlers: Load, EditZone, DeleteZone, GetZones, GetChanges, Close

use crate::board::zones::{check_coordinates, Zone, ZoneBoard, ZoneEditRequest, ZoneId};
use crate::lsp::protocol::{error_codes, Response};
use crate::lsp::state::ServerState;
use serde::Deserialize;
use std::time::Instant;

use super::zone_error_response;

/// Handle Load request - replaces the board and reconciles every net
pub fn handle_load(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct LoadParams {
        zones: Vec<Zone>,
    }

    let params: LoadParams = match params.and_then(|p| serde_json::from_value(p).ok()) {
        Some(p) => p,
        None => {
            return Response::error(id, error_codes::INVALID_PARAMS,
                "Invalid params: expected {zones: Zone[]}".to_string());
        }
    };

    let start = Instant::now();
    let loaded = params.zones.len();

    let checked = params
        .zones
        .iter()
        .try_for_each(|zone| check_coordinates(zone.outline.contours().iter().flatten()));
    let board = match checked.and_then(|()| ZoneBoard::from_zones(params.zones)) {
        Ok(board) => board,
        Err(e) => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid params: {}", e),
            );
        }
    };

    state.reset();
    state.board = board;

    let report = state.engine.reconcile_board(&mut state.board, &mut state.changes, &|| false);

    log::info!(
        "[Zone Server] Loaded {} zones ({} after reconcile) in {:.2}ms",
        loaded,
        state.board.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Response::success(id, serde_json::json!({
        "status": "ok",
        "zone_count": state.board.len(),
        "report": report
    }))
}

/// Handle EditZone request - creates or reshapes a zone, then reconciles its net
pub fn handle_edit_zone(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let request: ZoneEditRequest = match params.map(serde_json::from_value) {
        Some(Ok(r)) => r,
        Some(Err(e)) => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid params: {}", e),
            );
        }
        None => {
            return Response::error(id, error_codes::INVALID_PARAMS,
                "Invalid params: expected {outline, net, layer}".to_string());
        }
    };

    match state.engine.apply_edit(&mut state.board, &request, &mut state.changes) {
        Ok(outcome) => {
            log::info!(
                "[Zone Server] Edited zone {}: {} merges, {} created, {} removed",
                outcome.zone_id,
                outcome.report.merged,
                outcome.report.created.len(),
                outcome.report.removed.len()
            );
            Response::from_serializable(id, &outcome)
        }
        Err(e) => {
            log::warn!("[Zone Server] Edit rejected: {}", e);
            zone_error_response(id, e)
        }
    }
}

/// Handle DeleteZone request
pub fn handle_delete_zone(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct DeleteParams {
        zone_id: ZoneId,
    }

    let params: DeleteParams = match params.and_then(|p| serde_json::from_value(p).ok()) {
        Some(p) => p,
        None => {
            return Response::error(id, error_codes::INVALID_PARAMS,
                "Invalid params: expected {zone_id: number}".to_string());
        }
    };

    match state.engine.delete_zone(&mut state.board, params.zone_id, &mut state.changes) {
        Ok(()) => {
            state
                .drc_violations
                .retain(|v| v.zone_a != params.zone_id && v.zone_b != params.zone_id);
            Response::success(id, serde_json::json!({
                "status": "ok",
                "zone_count": state.board.len()
            }))
        }
        Err(e) => zone_error_response(id, e),
    }
}

/// Handle GetZones request - returns the board in scan order
pub fn handle_get_zones(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    let zones: Vec<&Zone> = state.board.iter().collect();
    Response::from_serializable(id, &zones)
}

/// Handle GetChanges request - drains the undo log
pub fn handle_get_changes(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    let changes = std::mem::take(&mut state.changes);
    Response::from_serializable(id, &changes)
}

/// Handle Close request - drops the board and all cached results
pub fn handle_close(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    let zone_count = state.board.len();
    state.reset();
    log::info!("[Zone Server] Closed board with {} zones", zone_count);

    Response::success(id, serde_json::json!({
        "status": "ok",
        "released_zones": zone_count
    }))
}
