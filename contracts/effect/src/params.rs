//! The volume parameter family

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest level any instance may accept, in hundredths of a decibel.
/// This is the wire format's inherent floor, independent of capability.
pub const MIN_LEVEL_DB: i32 = -9600;

/// Highest level any instance may accept, in hundredths of a decibel.
pub const MAX_LEVEL_DB: i32 = 0;

/// A single settable value in the volume parameter family.
///
/// The variant set is closed: exhaustive matches need no fallback arm, and
/// adding a family member is a compile-visible change for every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Volume {
    /// Attenuation level in hundredths of a decibel
    LevelDb(i32),
    /// Output mute switch
    Mute(bool),
}

/// Family selector for [`Volume`], used by get-by-tag reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeTag {
    LevelDb,
    Mute,
}

impl Volume {
    /// The family slot this value occupies
    pub fn tag(&self) -> VolumeTag {
        match self {
            Volume::LevelDb(_) => VolumeTag::LevelDb,
            Volume::Mute(_) => VolumeTag::Mute,
        }
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Volume::LevelDb(level) => write!(f, "levelDb({level})"),
            Volume::Mute(mute) => write!(f, "mute({mute})"),
        }
    }
}

impl fmt::Display for VolumeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeTag::LevelDb => write!(f, "levelDb"),
            VolumeTag::Mute => write!(f, "mute"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_variant() {
        assert_eq!(Volume::LevelDb(-100).tag(), VolumeTag::LevelDb);
        assert_eq!(Volume::Mute(true).tag(), VolumeTag::Mute);
    }

    #[test]
    fn structural_equality() {
        assert_eq!(Volume::LevelDb(-100), Volume::LevelDb(-100));
        assert_ne!(Volume::LevelDb(-100), Volume::LevelDb(-101));
        assert_ne!(Volume::LevelDb(0), Volume::Mute(false));
    }

    #[test]
    fn band_is_ordered() {
        assert!(MIN_LEVEL_DB < MAX_LEVEL_DB);
    }
}
