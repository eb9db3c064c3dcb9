//! Harness for driving enumerated effect instances
//!
//! The harness owns everything the checker deliberately does not: instance
//! enumeration, open/close bracketing, and naming of per-instance reports.

use crate::framework::{ConformanceConfig, ConformanceRunner};
use crate::reports::ConformanceReport;
use fxc_effect::{EffectControl, EffectDescriptor, EffectError, EffectFactory};
use std::sync::Arc;

/// Result of driving one enumerated instance through the suite.
///
/// An `Err` outcome means the instance failed outside the defined
/// success/rejection vocabulary; the harness records it and moves on to the
/// next instance rather than aborting the sweep.
#[derive(Debug)]
pub struct InstanceRun {
    pub instance: String,
    pub outcome: Result<ConformanceReport, EffectError>,
}

impl InstanceRun {
    pub fn is_conformant(&self) -> bool {
        matches!(&self.outcome, Ok(report) if report.is_conformant())
    }
}

/// Test harness for conformance testing
pub struct TestHarness {
    runner: ConformanceRunner,
}

impl TestHarness {
    /// Create a new test harness with the default configuration
    pub fn new() -> Self {
        Self {
            runner: ConformanceRunner::new(ConformanceConfig::default()),
        }
    }

    /// Create a test harness with a custom configuration
    pub fn with_config(config: ConformanceConfig) -> Self {
        Self {
            runner: ConformanceRunner::new(config),
        }
    }

    /// Run the suite against an already-opened instance
    pub async fn run(
        &self,
        effect: &Arc<dyn EffectControl>,
    ) -> Result<ConformanceReport, EffectError> {
        self.runner.run(effect).await
    }

    /// Run the suite and panic with the rendered report on non-conformance
    pub async fn assert_conformant(&self, effect: &Arc<dyn EffectControl>) {
        match self.runner.run(effect).await {
            Ok(report) => {
                if !report.is_conformant() {
                    panic!(
                        "effect instance '{}' is not conformant:\n{}",
                        report.instance_name,
                        report.to_text()
                    );
                }
            }
            Err(err) => panic!("conformance run aborted: {err}"),
        }
    }

    /// Stable, filesystem-safe label for an enumerated instance
    pub fn instance_label(descriptor: &EffectDescriptor) -> String {
        let raw = format!(
            "Implementor_{}_name_{}_uuid_{}",
            descriptor.implementor, descriptor.name, descriptor.uuid
        );
        raw.chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// Enumerate the factory's instances and run the suite against each,
    /// creating, opening and closing every instance around its run.
    pub async fn run_factory(&self, factory: &dyn EffectFactory) -> Vec<InstanceRun> {
        let mut runs = Vec::new();

        for descriptor in factory.enumerate().await {
            let instance = Self::instance_label(&descriptor);
            tracing::info!(instance = %instance, "running instance");

            let outcome = self.run_instance(factory, &descriptor).await;
            if let Err(err) = &outcome {
                tracing::error!(instance = %instance, error = %err, "instance run aborted");
            }

            runs.push(InstanceRun { instance, outcome });
        }

        runs
    }

    async fn run_instance(
        &self,
        factory: &dyn EffectFactory,
        descriptor: &EffectDescriptor,
    ) -> Result<ConformanceReport, EffectError> {
        let effect = factory.create(&descriptor.uuid).await?;
        effect.open().await?;

        let run = self.runner.run(&effect).await;

        match effect.close().await {
            Ok(()) => {}
            Err(close_err) if run.is_ok() => return Err(close_err),
            Err(close_err) => {
                tracing::warn!(error = %close_err, "close failed after aborted run");
            }
        }

        let mut report = run?;
        report.instance_name = Self::instance_label(descriptor);
        Ok(report)
    }

    /// Run every instance and report whether all of them are conformant
    pub async fn check_all_conformant(
        &self,
        factory: &dyn EffectFactory,
    ) -> (bool, Vec<InstanceRun>) {
        let runs = self.run_factory(factory).await;
        let all_conformant = !runs.is_empty() && runs.iter().all(InstanceRun::is_conformant);
        (all_conformant, runs)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxc_effect::VolumeCapability;
    use fxc_volume::{VolumeEffect, VolumeFactory};

    #[test]
    fn instance_label_is_sanitized() {
        let descriptor =
            EffectDescriptor::new("volume (ref)", VolumeCapability::full_range())
                .with_implementor("FXC Team");
        let label = TestHarness::instance_label(&descriptor);
        assert!(label.starts_with("Implementor_FXC_Team_name_volume__ref__uuid_"));
        assert!(label.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }

    #[tokio::test]
    async fn reference_factory_sweep_is_conformant() {
        let factory = VolumeFactory::reference();
        let harness = TestHarness::new();

        let (all_conformant, runs) = harness.check_all_conformant(&factory).await;
        assert!(all_conformant);
        assert_eq!(runs.len(), factory.enumerate().await.len());
    }

    #[tokio::test]
    async fn assert_conformant_accepts_the_reference() {
        let effect: Arc<dyn EffectControl> =
            Arc::new(VolumeEffect::with_capability(VolumeCapability::full_range()));
        effect.open().await.unwrap();

        TestHarness::new().assert_conformant(&effect).await;
    }

    #[tokio::test]
    async fn empty_factory_is_not_conformant() {
        let factory = VolumeFactory::with_descriptors(vec![]);
        let (all_conformant, runs) = TestHarness::new().check_all_conformant(&factory).await;
        assert!(!all_conformant);
        assert!(runs.is_empty());
    }
}
