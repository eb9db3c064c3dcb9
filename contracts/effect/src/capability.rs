//! Plugin-reported parameter bounds

use crate::params::{MAX_LEVEL_DB, MIN_LEVEL_DB};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bounds an instance reports for the volume parameter family.
///
/// A capability narrows the protocol band, never widens it: `max_level_db`
/// is expected to stay within `[MIN_LEVEL_DB, MAX_LEVEL_DB]`. A report
/// outside that band is undefined input and is surfaced by descriptor
/// validation rather than reinterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeCapability {
    /// Highest level this instance accepts
    pub max_level_db: i32,

    /// Vendor extension values, opaque to the suite
    #[serde(default)]
    pub extension: HashMap<String, serde_json::Value>,
}

impl Default for VolumeCapability {
    fn default() -> Self {
        Self::full_range()
    }
}

impl VolumeCapability {
    /// Capability covering the entire protocol band
    pub fn full_range() -> Self {
        Self {
            max_level_db: MAX_LEVEL_DB,
            extension: HashMap::new(),
        }
    }

    /// Capability capped below the protocol ceiling
    pub fn capped(max_level_db: i32) -> Self {
        Self {
            max_level_db,
            extension: HashMap::new(),
        }
    }

    /// Whether the reported bound stays within the protocol band
    pub fn is_within_band(&self) -> bool {
        (MIN_LEVEL_DB..=MAX_LEVEL_DB).contains(&self.max_level_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_range_is_within_band() {
        assert!(VolumeCapability::full_range().is_within_band());
    }

    #[test]
    fn widened_capability_is_flagged() {
        assert!(!VolumeCapability::capped(MAX_LEVEL_DB + 1).is_within_band());
        assert!(!VolumeCapability::capped(MIN_LEVEL_DB - 1).is_within_band());
    }

    #[test]
    fn narrowed_capability_is_within_band() {
        assert!(VolumeCapability::capped(-1200).is_within_band());
    }
}
