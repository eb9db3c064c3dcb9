//! Factory for reference volume effect instances

use crate::effect::VolumeEffect;
use async_trait::async_trait;
use fxc_effect::{
    EffectControl, EffectDescriptor, EffectError, EffectFactory, VolumeCapability,
};
use std::sync::Arc;
use uuid::Uuid;

/// Enumerates a fixed set of descriptors and mints fresh instances for them.
pub struct VolumeFactory {
    descriptors: Vec<EffectDescriptor>,
}

impl VolumeFactory {
    /// Factory with a single full-range instance
    pub fn new() -> Self {
        Self::with_descriptors(vec![reference_descriptor(
            "volume",
            VolumeCapability::full_range(),
        )])
    }

    /// Factory over caller-supplied descriptors
    pub fn with_descriptors(descriptors: Vec<EffectDescriptor>) -> Self {
        Self { descriptors }
    }

    /// The reference lineup: a full-range instance and an attenuator whose
    /// capability stops 12 dB below the protocol ceiling.
    pub fn reference() -> Self {
        Self::with_descriptors(vec![
            reference_descriptor("volume", VolumeCapability::full_range()),
            reference_descriptor("attenuator", VolumeCapability::capped(-1200)),
        ])
    }
}

impl Default for VolumeFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn reference_descriptor(name: &str, capability: VolumeCapability) -> EffectDescriptor {
    EffectDescriptor::new(name, capability)
        .with_implementor("FXC Reference")
        .with_version(env!("CARGO_PKG_VERSION"))
}

#[async_trait]
impl EffectFactory for VolumeFactory {
    async fn enumerate(&self) -> Vec<EffectDescriptor> {
        self.descriptors.clone()
    }

    async fn create(&self, uuid: &Uuid) -> Result<Arc<dyn EffectControl>, EffectError> {
        let descriptor = self
            .descriptors
            .iter()
            .find(|d| d.uuid == *uuid)
            .ok_or_else(|| EffectError::NotFound(uuid.to_string()))?;

        Ok(Arc::new(VolumeEffect::new(descriptor.clone())))
    }
}
