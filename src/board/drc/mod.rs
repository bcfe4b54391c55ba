//! Zone-to-zone clearance checking (DRC)
//!
//! Uses an R-tree over zone bounding boxes for candidate pair filtering and
//! Rayon for parallel pair evaluation.
//!
//! # Submodules
//! - `types` - Violation records and the violation sink
//! - `checks` - Pair filter, clearance rule and pair/edge checks
//! - `runners` - Full and targeted DRC entry points

mod types;
mod checks;
mod runners;

pub use types::{DrcViolation, EdgeHit, ViolationKind, ViolationSink};

pub use checks::{
    check_zone_edge,
    check_zone_pair,
    effective_clearance,
    should_check_pair,
    KEEPOUT_CLEARANCE,
};

pub use runners::{run_zone_drc, run_zone_drc_for};
