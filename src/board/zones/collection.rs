//! Ordered zone collection
//!
//! The board owns its zones in insertion order. Scans over the collection
//! follow that order, so every pass is deterministic.

use indexmap::IndexMap;

use crate::board::geometry::PolygonOutline;
use crate::error::{Result, ZoneError};

use super::types::{Zone, ZoneId, ZoneSettings};

#[derive(Debug, Clone, Default)]
pub struct ZoneBoard {
    zones: IndexMap<ZoneId, Zone>,
    next_id: u64,
}

impl ZoneBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board holding `zones` in the given order. Ids must be unique.
    pub fn from_zones(zones: impl IntoIterator<Item = Zone>) -> Result<Self> {
        let mut board = Self::new();
        for zone in zones {
            board.insert_zone(zone)?;
        }
        Ok(board)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Zone> {
        self.zones.values_mut()
    }

    pub fn ids(&self) -> Vec<ZoneId> {
        self.zones.keys().copied().collect()
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn get_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(&id)
    }

    /// Lookup that surfaces a missing zone as an error
    pub fn zone(&self, id: ZoneId) -> Result<&Zone> {
        self.zones.get(&id).ok_or(ZoneError::UnknownZone(id))
    }

    pub fn contains(&self, id: ZoneId) -> bool {
        self.zones.contains_key(&id)
    }

    /// Position of a zone in scan order
    pub fn index_of(&self, id: ZoneId) -> Option<usize> {
        self.zones.get_index_of(&id)
    }

    pub fn get_index(&self, index: usize) -> Option<&Zone> {
        self.zones.get_index(index).map(|(_, z)| z)
    }

    /// Allocate a fresh id and append a zone at the end of the scan order
    pub fn insert(&mut self, settings: ZoneSettings, outline: PolygonOutline) -> ZoneId {
        let id = self.allocate_id();
        self.zones.insert(id, Zone::new(id, settings, outline));
        id
    }

    /// Append a zone keeping its id
    pub fn insert_zone(&mut self, zone: Zone) -> Result<ZoneId> {
        let id = zone.id;
        if self.zones.contains_key(&id) {
            return Err(ZoneError::DuplicateZone(id));
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.zones.insert(id, zone);
        Ok(id)
    }

    /// Remove a zone, keeping the relative order of the others
    pub fn remove(&mut self, id: ZoneId) -> Option<Zone> {
        self.zones.shift_remove(&id)
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Ids of the zones on a net, in scan order
    pub fn ids_on_net(&self, net: i32) -> Vec<ZoneId> {
        self.zones
            .values()
            .filter(|z| z.net() == net)
            .map(|z| z.id)
            .collect()
    }

    /// Distinct nets in order of first appearance
    pub fn nets(&self) -> Vec<i32> {
        let mut nets: Vec<i32> = Vec::new();
        for zone in self.zones.values() {
            if !nets.contains(&zone.net()) {
                nets.push(zone.net());
            }
        }
        nets
    }

    pub fn clear_modified(&mut self) {
        for zone in self.zones.values_mut() {
            zone.set_modified(false);
        }
    }

    /// Next unused id. Wraps past `u64::MAX` and skips taken ids.
    fn allocate_id(&mut self) -> ZoneId {
        while self.zones.contains_key(&ZoneId(self.next_id)) {
            self.next_id = self.next_id.wrapping_add(1);
        }
        let id = ZoneId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}
