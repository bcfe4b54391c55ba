//! Board-level zone model: geometry, zones, fills and DRC

pub mod geometry;
pub mod zones;
pub mod fill;
pub mod drc;
