use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use zone_engine::config::EngineConfig;
use zone_engine::lsp::{dispatch, error_codes, Request, Response, ServerState};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EngineConfig::from_env()?;
    log::info!("[Zone Server] Starting zone server with {:?}", config);

    let mut state = ServerState::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("[Zone Server] Error reading stdin: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                log::debug!("[Zone Server] {}", request.method);
                dispatch(&mut state, request)
            }
            Err(e) => {
                log::warn!("[Zone Server] Failed to parse request: {}", e);
                Response::error(None, error_codes::PARSE_ERROR, format!("Parse error: {}", e))
            }
        };

        let response_json =
            serde_json::to_string(&response).context("Failed to serialize response")?;
        writeln!(stdout, "{}", response_json).context("Failed to write response")?;
        stdout.flush()?;
    }

    log::info!("[Zone Server] Shutting down...");
    Ok(())
}
