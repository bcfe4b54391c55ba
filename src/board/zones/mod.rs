//! Copper zones and the net-wide merge engine
//!
//! # Submodules
//! - `types` - Zone, settings, layers and merge eligibility
//! - `collection` - Ordered zone board
//! - `changes` - Undo change reporting
//! - `normalize` - Self-intersection normalizer
//! - `intersect` - Zone intersection tester
//! - `combine` - Zone area combiner
//! - `engine` - Net-wide area reconciler
//! - `edit` - Validated edit boundary

mod types;
mod collection;
mod changes;
mod normalize;
mod intersect;
mod combine;
mod engine;
mod edit;

pub use types::{
    can_merge, is_copper_layer, same_kind, same_layer, same_net, same_priority,
    LayerId, Zone, ZoneFill, ZoneId, ZoneSettings, FIRST_NON_COPPER_LAYER,
};

pub use collection::ZoneBoard;

pub use changes::{ChangeSink, NoChanges, ZoneChange};

pub use normalize::{normalize, normalize_zone, NormalizeResult};

pub use intersect::{intersects, outlines_intersect};

pub use combine::{combine_areas, combine_zones};

pub use engine::{ReconcileReport, ZoneEngine};

pub use edit::{check_coordinates, validate_edit, EditOutcome, ZoneEditRequest};
