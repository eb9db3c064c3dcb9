//! Conformance runner and configuration

use crate::checker::{
    boundary_levels, is_in_range, ExpectedOutcome, ParameterCheck, ParameterChecker,
};
use crate::reports::{ConformanceReport, TestCategory, TestResult};
use fxc_effect::{
    validate_descriptor, EffectControl, EffectError, Volume, MAX_LEVEL_DB,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Configuration for a conformance run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConformanceConfig {
    /// Run descriptor checks
    pub run_descriptor: bool,

    /// Run the parameter set/get checks
    pub run_parameter: bool,

    /// Run behavioral checks
    pub run_behavioral: bool,

    /// Keep running later categories after a category records failures
    pub continue_on_failure: bool,

    /// Verbose progress logging
    pub verbose: bool,

    /// Level values to queue, in order
    pub levels: Vec<i32>,

    /// Mute values to queue after the levels
    pub mutes: Vec<bool>,
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        Self {
            run_descriptor: true,
            run_parameter: true,
            run_behavioral: true,
            continue_on_failure: true,
            verbose: false,
            levels: boundary_levels(),
            mutes: vec![true, false],
        }
    }
}

/// Errors loading a runner configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(String),
}

impl ConformanceConfig {
    /// Load configuration from TOML
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a file
    pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// The ordered evaluation queue this configuration describes
    pub fn cases(&self) -> Vec<Volume> {
        let mut cases: Vec<Volume> = self.levels.iter().copied().map(Volume::LevelDb).collect();
        cases.extend(self.mutes.iter().copied().map(Volume::Mute));
        cases
    }
}

/// Conformance test runner for a single opened effect instance
pub struct ConformanceRunner {
    config: ConformanceConfig,
}

impl ConformanceRunner {
    /// Create a new conformance runner
    pub fn new(config: ConformanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConformanceConfig {
        &self.config
    }

    /// Run all configured categories against an opened instance.
    ///
    /// Expected rejections and round-trip mismatches land in the report;
    /// anything outside the success/rejection vocabulary aborts the run
    /// and propagates.
    pub async fn run(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<ConformanceReport, EffectError> {
        let start = Instant::now();
        let descriptor = effect.descriptor().await?;
        let mut report = ConformanceReport::new(descriptor.name.clone());

        tracing::info!(instance = %descriptor.name, "starting conformance run");

        if self.config.run_descriptor {
            let results = self.run_descriptor_checks(effect).await?;
            report.add_results(TestCategory::Descriptor, results);
        }

        if self.config.run_parameter {
            if self.should_continue(&report) {
                let results = self.run_parameter_checks(effect).await?;
                report.add_results(TestCategory::Parameter, results);
            } else {
                report.add_results(
                    TestCategory::Parameter,
                    vec![TestResult::skipped("parameter", "earlier failures")],
                );
            }
        }

        if self.config.run_behavioral {
            if self.should_continue(&report) {
                let results = self.run_behavioral_checks(effect).await?;
                report.add_results(TestCategory::Behavioral, results);
            } else {
                report.add_results(
                    TestCategory::Behavioral,
                    vec![TestResult::skipped("behavioral", "earlier failures")],
                );
            }
        }

        report.duration = start.elapsed();
        report.finalize();

        tracing::info!(
            instance = %report.instance_name,
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "conformance run complete"
        );

        Ok(report)
    }

    fn should_continue(&self, report: &ConformanceReport) -> bool {
        self.config.continue_on_failure || !report.has_failures()
    }

    // Descriptor checks

    async fn run_descriptor_checks(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<Vec<TestResult>, EffectError> {
        Ok(vec![
            self.check_metadata_completeness(effect).await?,
            self.check_descriptor_validity(effect).await?,
            self.check_capability_in_band(effect).await?,
        ])
    }

    async fn check_metadata_completeness(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<TestResult, EffectError> {
        let start = Instant::now();
        let descriptor = effect.descriptor().await?;

        let mut errors = Vec::new();
        if descriptor.name.is_empty() {
            errors.push("descriptor.name is empty");
        }
        if descriptor.implementor.is_empty() {
            errors.push("descriptor.implementor is empty");
        }
        if descriptor.version.is_empty() {
            errors.push("descriptor.version is empty");
        }

        Ok(if errors.is_empty() {
            TestResult::passed("metadata_completeness", start.elapsed())
        } else {
            TestResult::failed("metadata_completeness", errors.join("; "), start.elapsed())
        })
    }

    async fn check_descriptor_validity(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<TestResult, EffectError> {
        let start = Instant::now();
        let descriptor = effect.descriptor().await?;
        let validation = validate_descriptor(&descriptor);

        Ok(if validation.valid {
            let mut result = TestResult::passed("descriptor_validity", start.elapsed());
            for warning in &validation.warnings {
                result.add_warning(warning.message.clone());
            }
            result
        } else {
            let errors: Vec<String> = validation
                .errors
                .iter()
                .map(|e| e.message.clone())
                .collect();
            TestResult::failed("descriptor_validity", errors.join("; "), start.elapsed())
        })
    }

    async fn check_capability_in_band(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<TestResult, EffectError> {
        let start = Instant::now();
        let descriptor = effect.descriptor().await?;

        Ok(if descriptor.capability.is_within_band() {
            TestResult::passed("capability_in_band", start.elapsed())
        } else {
            TestResult::failed(
                "capability_in_band",
                format!(
                    "capability max_level_db {} falls outside the protocol band",
                    descriptor.capability.max_level_db
                ),
                start.elapsed(),
            )
        })
    }

    // Parameter checks

    async fn run_parameter_checks(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<Vec<TestResult>, EffectError> {
        let cases = self.config.cases();
        if self.config.verbose {
            tracing::info!(count = cases.len(), "evaluating parameter queue");
        }

        let checks = ParameterChecker::evaluate(effect.as_ref(), &cases).await?;
        Ok(checks.into_iter().map(result_from_check).collect())
    }

    // Behavioral checks

    async fn run_behavioral_checks(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<Vec<TestResult>, EffectError> {
        Ok(vec![
            self.check_idempotent_set(effect).await?,
            self.check_rejection_preserves_state(effect).await?,
        ])
    }

    /// Pick the first queued level the reported capability accepts.
    async fn accepted_level(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<Option<Volume>, EffectError> {
        let descriptor = effect.descriptor().await?;
        Ok(self
            .config
            .levels
            .iter()
            .copied()
            .map(Volume::LevelDb)
            .find(|value| is_in_range(value, &descriptor.capability)))
    }

    async fn check_idempotent_set(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<TestResult, EffectError> {
        let start = Instant::now();
        let value = self
            .accepted_level(effect)
            .await?
            .unwrap_or(Volume::Mute(true));

        for attempt in 1..=2u8 {
            match effect.set_parameter(value).await {
                Ok(()) => {}
                Err(EffectError::IllegalArgument(reason)) => {
                    return Ok(TestResult::failed(
                        "idempotent_set",
                        format!("in-range value {value} rejected on attempt {attempt}: {reason}"),
                        start.elapsed(),
                    ));
                }
                Err(other) => return Err(other),
            }

            let read = effect.get_parameter(value.tag()).await?;
            if read != value {
                return Ok(TestResult::failed(
                    "idempotent_set",
                    format!("attempt {attempt}: set {value} but read back {read}"),
                    start.elapsed(),
                ));
            }
        }

        Ok(TestResult::passed("idempotent_set", start.elapsed()))
    }

    async fn check_rejection_preserves_state(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<TestResult, EffectError> {
        let start = Instant::now();
        let Some(baseline) = self.accepted_level(effect).await? else {
            return Ok(TestResult::skipped(
                "rejection_preserves_state",
                "no accepted level available under the reported capability",
            ));
        };

        match effect.set_parameter(baseline).await {
            Ok(()) => {}
            Err(EffectError::IllegalArgument(reason)) => {
                return Ok(TestResult::failed(
                    "rejection_preserves_state",
                    format!("baseline {baseline} rejected: {reason}"),
                    start.elapsed(),
                ));
            }
            Err(other) => return Err(other),
        }

        // always outside the protocol band, whatever the capability says
        let out_of_range = Volume::LevelDb(MAX_LEVEL_DB + 1);
        match effect.set_parameter(out_of_range).await {
            Ok(()) => {
                return Ok(TestResult::failed(
                    "rejection_preserves_state",
                    format!("out-of-range value {out_of_range} was accepted"),
                    start.elapsed(),
                ));
            }
            Err(EffectError::IllegalArgument(_)) => {}
            Err(other) => return Err(other),
        }

        let read = effect.get_parameter(baseline.tag()).await?;
        Ok(if read == baseline {
            TestResult::passed("rejection_preserves_state", start.elapsed())
        } else {
            TestResult::failed(
                "rejection_preserves_state",
                format!("rejected set moved stored value from {baseline} to {read}"),
                start.elapsed(),
            )
        })
    }
}

/// Turn one evaluated parameter check into a named test result.
fn result_from_check(check: ParameterCheck) -> TestResult {
    let name = match check.value {
        Volume::LevelDb(level) => format!("set_get_level_{level}"),
        Volume::Mute(mute) => format!("set_get_mute_{mute}"),
    };

    let mut result = if check.passed {
        TestResult::passed(name, check.duration)
    } else {
        let detail = check
            .detail
            .clone()
            .unwrap_or_else(|| "expected and observed outcomes differ".to_string());
        TestResult::failed(name, detail, check.duration)
    };

    result.add_detail(
        "expected",
        match check.expected {
            ExpectedOutcome::Accepted => "accepted",
            ExpectedOutcome::Rejected => "rejected",
        },
    );
    result.add_detail("observed", check.observed.to_string());
    result
}
