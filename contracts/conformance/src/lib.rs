//! FXC Effect Parameter Conformance Suite
//!
//! Validates that an effect plugin implementation honors the parameter
//! validation and round-trip contract:
//!
//! - **Descriptor conformance**: identity fields are complete and the
//!   reported capability stays inside the protocol band.
//! - **Parameter conformance**: every queued parameter value is either
//!   accepted and read back unchanged, or refused with the illegal-argument
//!   signal, exactly as its in-range classification demands.
//! - **Behavioral conformance**: accepted values are idempotent to re-set,
//!   and rejected values leave stored state untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use fxc_conformance::{ConformanceConfig, ConformanceRunner};
//!
//! let runner = ConformanceRunner::new(ConformanceConfig::default());
//! let report = runner.run(&effect).await?;
//! println!("{}", report.to_text());
//! ```

pub mod checker;
pub mod framework;
pub mod harness;
pub mod reports;

pub use checker::{
    boundary_levels, default_cases, is_in_range, is_level_in_range, ExpectedOutcome,
    ObservedOutcome, ParameterCheck, ParameterChecker,
};
pub use framework::{ConfigError, ConformanceConfig, ConformanceRunner};
pub use harness::{InstanceRun, TestHarness};
pub use reports::{ConformanceReport, ReportSummary, TestCategory, TestResult, TestStatus};
