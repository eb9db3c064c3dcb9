//! Core effect plugin contract

use crate::descriptor::EffectDescriptor;
use crate::params::{Volume, VolumeTag};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// The effect control trait - the primary contract for plugin implementations.
///
/// An opened instance holds one value per parameter family and answers reads
/// with the last successfully set value. A set attempt has exactly three
/// outcomes: success, rejection with [`EffectError::IllegalArgument`], or a
/// failure outside that vocabulary, which callers treat as fatal for the
/// instance.
#[async_trait]
pub trait EffectControl: Send + Sync {
    /// Returns the instance descriptor, including the current capability.
    /// Fails only through transport-level errors.
    async fn descriptor(&self) -> Result<EffectDescriptor, EffectError>;

    /// Brings the instance into the operating state and seeds parameter
    /// defaults. Opening an already-open instance is an illegal state.
    async fn open(&self) -> Result<(), EffectError>;

    /// Leaves the operating state. Closing a closed instance is an illegal
    /// state.
    async fn close(&self) -> Result<(), EffectError>;

    /// Applies one parameter value. Out-of-range values must be refused
    /// with [`EffectError::IllegalArgument`] and must leave the previously
    /// stored value for that family untouched.
    async fn set_parameter(&self, value: Volume) -> Result<(), EffectError>;

    /// Reads the last successfully set value for a family.
    async fn get_parameter(&self, tag: VolumeTag) -> Result<Volume, EffectError>;
}

/// Enumerates available effect instances and creates them on demand.
#[async_trait]
pub trait EffectFactory: Send + Sync {
    /// Descriptors of every instance type this factory can create
    async fn enumerate(&self) -> Vec<EffectDescriptor>;

    /// Creates a fresh, not-yet-opened instance for the given uuid
    async fn create(&self, uuid: &Uuid) -> Result<Arc<dyn EffectControl>, EffectError>;
}

/// Errors an effect plugin can produce.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    /// The defined rejection signal for an out-of-range parameter value
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// Lifecycle misuse, e.g. setting a parameter on a closed instance
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Anything outside the defined success/rejection vocabulary
    #[error("transport failure: {0}")]
    Transport(String),

    /// Factory lookup miss
    #[error("no such effect: {0}")]
    NotFound(String),
}

impl EffectError {
    /// Whether this error is the defined parameter rejection signal
    pub fn is_rejection(&self) -> bool {
        matches!(self, EffectError::IllegalArgument(_))
    }
}
