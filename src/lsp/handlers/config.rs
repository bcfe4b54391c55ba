//! Configuration handler: Configure

use crate::config::EngineConfig;
use crate::lsp::protocol::{error_codes, Response};
use crate::lsp::state::ServerState;

/// Handle Configure request - overlays the given fields on the current config
pub fn handle_configure(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let updates = match params {
        Some(serde_json::Value::Object(map)) => map,
        _ => {
            return Response::error(id, error_codes::INVALID_PARAMS,
                "Invalid params: expected an object of config fields".to_string());
        }
    };

    let mut merged = match serde_json::to_value(state.config()) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => {
            return Response::error(id, error_codes::INTERNAL_ERROR,
                "Failed to serialize current config".to_string());
        }
    };
    for (key, value) in updates {
        if !merged.contains_key(&key) {
            return Response::error(
                id,
                error_codes::CONFIG_FAILED,
                format!("Unknown config field: {}", key),
            );
        }
        merged.insert(key, value);
    }

    let config: EngineConfig = match serde_json::from_value(serde_json::Value::Object(merged)) {
        Ok(c) => c,
        Err(e) => {
            return Response::error(
                id,
                error_codes::CONFIG_FAILED,
                format!("Invalid config: {}", e),
            );
        }
    };

    log::info!("[Zone Server] Configured: {:?}", config);
    state.engine.set_config(config);
    Response::from_serializable(id, state.config())
}
