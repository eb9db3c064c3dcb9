//! Descriptor validation
//!
//! Structural checks on a reported descriptor that need no live instance:
//! identity fields, version syntax, and the capability staying inside the
//! protocol band.

use crate::descriptor::EffectDescriptor;
use crate::params::{MAX_LEVEL_DB, MIN_LEVEL_DB};
use serde::{Deserialize, Serialize};

/// Result of descriptor validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,

    /// Validation errors (if any)
    pub errors: Vec<ValidationError>,

    /// Validation warnings (non-fatal)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a passing validation result
    pub fn pass() -> Self {
        Self {
            valid: true,
            errors: vec![],
            warnings: vec![],
        }
    }

    /// Add an error
    pub fn with_error(mut self, error: ValidationError) -> Self {
        self.errors.push(error);
        self.valid = false;
        self
    }

    /// Add a warning
    pub fn with_warning(mut self, warning: ValidationWarning) -> Self {
        self.warnings.push(warning);
        self
    }
}

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error code
    pub code: String,

    /// Error message
    pub message: String,

    /// Field that caused the error (if applicable)
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Validation warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Warning code
    pub code: String,

    /// Warning message
    pub message: String,

    /// Field that caused the warning (if applicable)
    pub field: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Validate a reported effect descriptor
pub fn validate_descriptor(descriptor: &EffectDescriptor) -> ValidationResult {
    let mut result = ValidationResult::pass();

    if descriptor.name.is_empty() {
        result = result.with_error(
            ValidationError::new("INVALID_NAME", "Effect name cannot be empty")
                .with_field("descriptor.name"),
        );
    }

    if descriptor.implementor.is_empty() {
        result = result.with_error(
            ValidationError::new("INVALID_IMPLEMENTOR", "Implementor cannot be empty")
                .with_field("descriptor.implementor"),
        );
    }

    if descriptor.uuid.is_nil() {
        result = result.with_warning(
            ValidationWarning::new(
                "NIL_UUID",
                "Descriptor uuid is nil; instances cannot be told apart",
            )
            .with_field("descriptor.uuid"),
        );
    }

    if descriptor.version.is_empty() {
        result = result.with_error(
            ValidationError::new("INVALID_VERSION", "Version cannot be empty")
                .with_field("descriptor.version"),
        );
    } else if semver::Version::parse(&descriptor.version).is_err() {
        result = result.with_warning(
            ValidationWarning::new(
                "NON_SEMVER_VERSION",
                "Version is not valid semver; consider using semver for comparability",
            )
            .with_field("descriptor.version"),
        );
    }

    if descriptor.capability.max_level_db > MAX_LEVEL_DB {
        result = result.with_error(
            ValidationError::new(
                "CAPABILITY_OUT_OF_BAND",
                format!(
                    "Capability max_level_db {} exceeds the protocol ceiling {}",
                    descriptor.capability.max_level_db, MAX_LEVEL_DB
                ),
            )
            .with_field("descriptor.capability.max_level_db"),
        );
    }

    if descriptor.capability.max_level_db < MIN_LEVEL_DB {
        result = result.with_error(
            ValidationError::new(
                "CAPABILITY_OUT_OF_BAND",
                format!(
                    "Capability max_level_db {} is below the protocol floor {}",
                    descriptor.capability.max_level_db, MIN_LEVEL_DB
                ),
            )
            .with_field("descriptor.capability.max_level_db"),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::VolumeCapability;

    #[test]
    fn valid_descriptor_passes() {
        let desc = EffectDescriptor::new("volume", VolumeCapability::full_range())
            .with_implementor("FXC Reference");
        let result = validate_descriptor(&desc);
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn empty_name_fails() {
        let desc = EffectDescriptor {
            name: String::new(),
            ..EffectDescriptor::new("volume", VolumeCapability::full_range())
        };
        let result = validate_descriptor(&desc);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.code == "INVALID_NAME"));
    }

    #[test]
    fn widened_capability_fails() {
        let desc =
            EffectDescriptor::new("volume", VolumeCapability::capped(MAX_LEVEL_DB + 1));
        let result = validate_descriptor(&desc);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.code == "CAPABILITY_OUT_OF_BAND"));
    }

    #[test]
    fn non_semver_version_warns() {
        let desc = EffectDescriptor::new("volume", VolumeCapability::full_range())
            .with_version("v1-beta");
        let result = validate_descriptor(&desc);
        assert!(result.valid);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == "NON_SEMVER_VERSION"));
    }

    #[test]
    fn nil_uuid_warns() {
        let desc = EffectDescriptor::default();
        let result = validate_descriptor(&desc);
        assert!(result.warnings.iter().any(|w| w.code == "NIL_UUID"));
    }
}
