//! DRC handlers: RunDRC, GetDRCViolations, CheckZoneEdge

use crate::board::drc::{check_zone_edge, run_zone_drc, run_zone_drc_for, DrcViolation};
use crate::board::zones::ZoneId;
use crate::lsp::protocol::{error_codes, Response};
use crate::lsp::state::ServerState;
use serde::Deserialize;
use std::time::Instant;

use super::zone_error_response;

/// Handle RunDRC request - full run, or only the pairs involving `zone_id`
pub fn handle_run_drc(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize, Default)]
    struct RunDRCParams {
        #[serde(default)]
        zone_id: Option<ZoneId>,
    }

    let params: RunDRCParams = match params {
        Some(serde_json::Value::Null) | None => RunDRCParams::default(),
        Some(p) => match serde_json::from_value(p) {
            Ok(p) => p,
            Err(e) => {
                return Response::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                );
            }
        },
    };

    let start = Instant::now();
    let mut violations: Vec<DrcViolation> = Vec::new();

    match params.zone_id {
        Some(zone_id) => {
            let config = state.engine.config();
            if let Err(e) = run_zone_drc_for(&state.board, zone_id, config, &mut violations) {
                return zone_error_response(id, e);
            }
            // Only the pairs of this zone were re-checked
            state
                .drc_violations
                .retain(|v| v.zone_a != zone_id && v.zone_b != zone_id);
            state.drc_violations.extend(violations);
        }
        None => {
            run_zone_drc(&state.board, state.engine.config(), &mut violations);
            state.drc_violations = violations;
        }
    }

    let elapsed = start.elapsed();
    log::info!(
        "[Zone Server] DRC completed in {:.2}ms: {} violations cached",
        elapsed.as_secs_f64() * 1000.0,
        state.drc_violations.len()
    );

    Response::success(id, serde_json::json!({
        "status": "ok",
        "violation_count": state.drc_violations.len(),
        "elapsed_ms": elapsed.as_secs_f64() * 1000.0
    }))
}

/// Handle GetDRCViolations request - returns cached DRC violations
pub fn handle_get_drc_violations(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    Response::from_serializable(id, &state.drc_violations)
}

/// Handle CheckZoneEdge request - live check of one outline edge while drawing
pub fn handle_check_zone_edge(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct EdgeParams {
        zone_id: ZoneId,
        corner_index: usize,
    }

    let params: EdgeParams = match params.and_then(|p| serde_json::from_value(p).ok()) {
        Some(p) => p,
        None => {
            return Response::error(id, error_codes::INVALID_PARAMS,
                "Invalid params: expected {zone_id: number, corner_index: number}".to_string());
        }
    };

    match check_zone_edge(&state.board, params.zone_id, params.corner_index) {
        Ok(violation) => Response::from_serializable(id, &violation),
        Err(e) => zone_error_response(id, e),
    }
}
