//! Effect instance descriptors

use crate::capability::VolumeCapability;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and reported bounds of one effect instance.
///
/// Queried on demand; a fetched descriptor is immutable, but distinct
/// instances (and in principle distinct fetches) may report different
/// capabilities, which is why consumers re-query instead of caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    /// Effect name (unique within an implementor)
    pub name: String,

    /// Vendor or project that ships the implementation
    pub implementor: String,

    /// Stable instance type identity
    pub uuid: Uuid,

    /// Implementation version (semver)
    pub version: String,

    /// Reported volume parameter bounds
    pub capability: VolumeCapability,
}

impl Default for EffectDescriptor {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            implementor: "Unknown".to_string(),
            uuid: Uuid::nil(),
            version: "0.1.0".to_string(),
            capability: VolumeCapability::default(),
        }
    }
}

impl EffectDescriptor {
    /// Descriptor with the given name and capability, fresh uuid
    pub fn new(name: impl Into<String>, capability: VolumeCapability) -> Self {
        Self {
            name: name.into(),
            capability,
            uuid: Uuid::new_v4(),
            ..Default::default()
        }
    }

    pub fn with_implementor(mut self, implementor: impl Into<String>) -> Self {
        self.implementor = implementor.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
