//! Engine configuration
//!
//! Loaded from a JSON file whose path comes from `ZONE_ENGINE_CONFIG`. Every
//! field is optional in the file and falls back to its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "ZONE_ENGINE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Arc approximation segments per full circle for filleted corners
    pub fillet_segments: u32,
    /// Clearance used when an edit request does not carry one
    pub default_clearance: i64,
    /// Upper bound on loop splits while normalizing one outline
    pub max_split_steps: usize,
    /// Evaluate DRC pairs on the rayon thread pool
    pub parallel_drc: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fillet_segments: 32,
            default_clearance: 0,
            max_split_steps: 10_000,
            parallel_drc: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Config from the file named by `ZONE_ENGINE_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }
}
