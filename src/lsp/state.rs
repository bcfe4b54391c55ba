//! Server state management for the zone server

use crate::board::drc::DrcViolation;
use crate::board::zones::{ZoneBoard, ZoneChange, ZoneEngine};
use crate::config::EngineConfig;

/// In-memory state: the board, its engine, and cached results
pub struct ServerState {
    pub board: ZoneBoard,
    pub engine: ZoneEngine,
    /// Undo log, drained by GetChanges
    pub changes: Vec<ZoneChange>,
    pub drc_violations: Vec<DrcViolation>,
}

impl ServerState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            board: ZoneBoard::new(),
            engine: ZoneEngine::new(config),
            changes: Vec::new(),
            drc_violations: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    /// Drop the board and every cached result, keeping the configuration
    pub fn reset(&mut self) {
        self.board.clear();
        self.changes.clear();
        self.drc_violations.clear();
        self.changes.shrink_to_fit();
        self.drc_violations.shrink_to_fit();
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
