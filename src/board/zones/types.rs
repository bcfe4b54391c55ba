//! Zone data model: ids, layers, settings and the zone itself

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::geometry::{BoundingBox, CornerSmoothing, PolygonOutline};

/// Layers below this id are copper
pub const FIRST_NON_COPPER_LAYER: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u32);

impl LayerId {
    pub fn is_copper(self) -> bool {
        is_copper_layer(self)
    }
}

/// Check if a layer is copper
pub fn is_copper_layer(layer: LayerId) -> bool {
    layer.0 < FIRST_NON_COPPER_LAYER
}

/// Stable zone identity, independent of collection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u64);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Electrical and rule settings of a zone. The engine never changes these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSettings {
    /// Net code; negative means no net assigned
    pub net: i32,
    pub layer: LayerId,
    pub priority: u32,
    #[serde(default)]
    pub keepout: bool,
    #[serde(default)]
    pub clearance: i64,
    #[serde(default)]
    pub smoothing: CornerSmoothing,
}

impl ZoneSettings {
    pub fn new(net: i32, layer: LayerId) -> Self {
        Self {
            net,
            layer,
            priority: 0,
            keepout: false,
            clearance: 0,
            smoothing: CornerSmoothing::None,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_clearance(mut self, clearance: i64) -> Self {
        self.clearance = clearance;
        self
    }

    pub fn with_keepout(mut self, keepout: bool) -> Self {
        self.keepout = keepout;
        self
    }

    pub fn with_smoothing(mut self, smoothing: CornerSmoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn has_net(&self) -> bool {
        self.net >= 0
    }
}

// Merge eligibility sub-checks

pub fn same_net(a: &ZoneSettings, b: &ZoneSettings) -> bool {
    a.net == b.net
}

pub fn same_layer(a: &ZoneSettings, b: &ZoneSettings) -> bool {
    a.layer == b.layer
}

pub fn same_priority(a: &ZoneSettings, b: &ZoneSettings) -> bool {
    a.priority == b.priority
}

pub fn same_kind(a: &ZoneSettings, b: &ZoneSettings) -> bool {
    a.keepout == b.keepout
}

/// Two zones may be merged into one when every sub-check holds
pub fn can_merge(a: &ZoneSettings, b: &ZoneSettings) -> bool {
    same_net(a, b) && same_layer(a, b) && same_priority(a, b) && same_kind(a, b)
}

/// Triangulated fill of a zone
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneFill {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl ZoneFill {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub settings: ZoneSettings,
    pub outline: PolygonOutline,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ZoneFill>,
    #[serde(skip)]
    modified: bool,
}

impl Zone {
    pub fn new(id: ZoneId, settings: ZoneSettings, outline: PolygonOutline) -> Self {
        Self {
            id,
            settings,
            outline,
            fill: None,
            modified: false,
        }
    }

    pub fn net(&self) -> i32 {
        self.settings.net
    }

    pub fn layer(&self) -> LayerId {
        self.settings.layer
    }

    pub fn is_keepout(&self) -> bool {
        self.settings.keepout
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.outline.bounding_box()
    }

    /// Outer contour corner count
    pub fn outer_corner_count(&self) -> usize {
        self.outline.outer().len()
    }

    /// Outline after corner smoothing; `segments` is the fillet arc resolution
    pub fn smoothed_outline(&self, segments: u32) -> PolygonOutline {
        self.settings.smoothing.apply(&self.outline, segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_eligibility() {
        let base = ZoneSettings::new(1, LayerId(0));
        assert!(can_merge(&base, &base));
        assert!(!can_merge(&base, &ZoneSettings::new(2, LayerId(0))));
        assert!(!can_merge(&base, &ZoneSettings::new(1, LayerId(1))));
        assert!(!can_merge(&base, &base.with_priority(3)));
        assert!(!can_merge(&base, &base.with_keepout(true)));
        // Clearance and smoothing do not affect merging
        assert!(can_merge(&base, &base.with_clearance(500)));
    }

    #[test]
    fn test_copper_layers() {
        assert!(LayerId(0).is_copper());
        assert!(LayerId(15).is_copper());
        assert!(!LayerId(FIRST_NON_COPPER_LAYER).is_copper());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: ZoneSettings =
            serde_json::from_str(r#"{"net": 3, "layer": 0, "priority": 1}"#).unwrap();
        assert_eq!(settings.net, 3);
        assert!(!settings.keepout);
        assert_eq!(settings.smoothing, CornerSmoothing::None);
    }
}
