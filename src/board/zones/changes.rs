//! Undo change reporting
//!
//! Every zone created or destroyed by the engine is reported exactly once.
//! Deleted zones are handed over whole so an undo layer can restore them.

use serde::{Deserialize, Serialize};

use super::types::{Zone, ZoneId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "zone")]
pub enum ZoneChange {
    Added(ZoneId),
    Deleted(Zone),
}

/// Receiver of zone creation and deletion events
pub trait ChangeSink {
    fn item_added(&mut self, id: ZoneId);
    fn item_deleted(&mut self, zone: Zone);
}

impl ChangeSink for Vec<ZoneChange> {
    fn item_added(&mut self, id: ZoneId) {
        self.push(ZoneChange::Added(id));
    }

    fn item_deleted(&mut self, zone: Zone) {
        self.push(ZoneChange::Deleted(zone));
    }
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoChanges;

impl ChangeSink for NoChanges {
    fn item_added(&mut self, _id: ZoneId) {}
    fn item_deleted(&mut self, _zone: Zone) {}
}
