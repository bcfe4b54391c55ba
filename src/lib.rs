//! Copper zone polygon engine
//!
//! Normalizes user-drawn zone outlines, merges overlapping zones of the same
//! net and layer, and checks clearance between zones of different nets.

pub mod board;
pub mod config;
pub mod error;
pub mod lsp;

pub use board::drc::{run_zone_drc, run_zone_drc_for, DrcViolation, ViolationKind};
pub use board::geometry::{Point, PolygonOutline};
pub use board::zones::{Zone, ZoneBoard, ZoneChange, ZoneEngine, ZoneId, ZoneSettings};
pub use config::EngineConfig;
pub use error::{Result, ZoneError};
