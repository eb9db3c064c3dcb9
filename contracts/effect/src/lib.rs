//! FXC Effect Contract
//!
//! This crate defines the formal interface that audio effect plugin
//! implementations must satisfy to be driven by the FXC conformance suite.
//! An effect plugin is anything that exposes the triad:
//!
//! - capability description (what parameter range the instance supports)
//! - parameter set (with a distinguished illegal-argument rejection)
//! - parameter get (read back the last successfully set value)
//!
//! The transport behind an implementation (in-process, binder, socket) is
//! opaque to consumers of this contract; every call is a single round-trip
//! with one definitive result.

pub mod capability;
pub mod contract;
pub mod descriptor;
pub mod params;
pub mod validation;

pub use capability::VolumeCapability;
pub use contract::{EffectControl, EffectError, EffectFactory};
pub use descriptor::EffectDescriptor;
pub use params::{Volume, VolumeTag, MAX_LEVEL_DB, MIN_LEVEL_DB};
pub use validation::{validate_descriptor, ValidationError, ValidationResult};
