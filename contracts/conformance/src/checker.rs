//! Parameter validation and round-trip checking
//!
//! The heart of the suite: classify each candidate value as in or out of
//! range for the capability the instance currently reports, apply it, and
//! verify the observable response matches the classification. Accepted
//! values must read back structurally equal; out-of-range values must be
//! refused with the illegal-argument signal.

use fxc_effect::{
    EffectControl, EffectError, Volume, VolumeCapability, MAX_LEVEL_DB, MIN_LEVEL_DB,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// The response the capability demands for a candidate value.
///
/// A pure function of (value, capability): ordering of the queue, prior
/// calls, and instance state play no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedOutcome {
    Accepted,
    Rejected,
}

/// The response the instance actually produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObservedOutcome {
    /// Set succeeded. `read_back` holds the follow-up get when one was
    /// issued; it is `None` when acceptance itself was already a violation
    /// and no read was warranted.
    Accepted { read_back: Option<Volume> },
    /// Set was refused with the illegal-argument signal
    Rejected,
}

impl std::fmt::Display for ObservedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservedOutcome::Accepted {
                read_back: Some(value),
            } => write!(f, "accepted, read back {value}"),
            ObservedOutcome::Accepted { read_back: None } => write!(f, "accepted"),
            ObservedOutcome::Rejected => write!(f, "rejected"),
        }
    }
}

/// Whether a level is inside both the protocol band and the capability.
///
/// The band expresses the wire format's inherent range; the capability can
/// only narrow it. A capability reported above the ceiling therefore never
/// widens acceptance.
pub fn is_level_in_range(capability: &VolumeCapability, level: i32) -> bool {
    level >= MIN_LEVEL_DB && level <= MAX_LEVEL_DB && level <= capability.max_level_db
}

/// Whether a parameter value must be accepted under the given capability.
pub fn is_in_range(value: &Volume, capability: &VolumeCapability) -> bool {
    match value {
        Volume::LevelDb(level) => is_level_in_range(capability, *level),
        // a boolean has no range to violate
        Volume::Mute(_) => true,
    }
}

/// Levels that pin down the band edges: strict-exclusive outside,
/// inclusive at both ends, plus one interior point.
pub fn boundary_levels() -> Vec<i32> {
    vec![
        MIN_LEVEL_DB - 1,
        MIN_LEVEL_DB,
        -100,
        MAX_LEVEL_DB,
        MAX_LEVEL_DB + 1,
    ]
}

/// The default evaluation queue: every boundary level plus both mutes.
pub fn default_cases() -> Vec<Volume> {
    let mut cases: Vec<Volume> = boundary_levels().into_iter().map(Volume::LevelDb).collect();
    cases.push(Volume::Mute(true));
    cases.push(Volume::Mute(false));
    cases
}

/// Record of one evaluated parameter value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterCheck {
    pub value: Volume,
    pub expected: ExpectedOutcome,
    pub observed: ObservedOutcome,
    pub passed: bool,
    /// Expected-vs-observed description, present on failures
    pub detail: Option<String>,
    pub duration: Duration,
}

impl ParameterCheck {
    fn judge(
        value: Volume,
        expected: ExpectedOutcome,
        observed: ObservedOutcome,
        duration: Duration,
    ) -> Self {
        let detail = match (expected, &observed) {
            (ExpectedOutcome::Accepted, ObservedOutcome::Accepted { read_back }) => {
                match read_back {
                    Some(read) if *read == value => None,
                    Some(read) => Some(format!("set {value} but read back {read}")),
                    None => Some(format!("no read-back recorded for accepted {value}")),
                }
            }
            (ExpectedOutcome::Accepted, ObservedOutcome::Rejected) => {
                Some(format!("in-range value {value} was rejected"))
            }
            (ExpectedOutcome::Rejected, ObservedOutcome::Rejected) => None,
            (ExpectedOutcome::Rejected, ObservedOutcome::Accepted { .. }) => {
                Some(format!("out-of-range value {value} was accepted"))
            }
        };

        Self {
            value,
            expected,
            passed: detail.is_none(),
            detail,
            observed,
            duration,
        }
    }
}

/// Drives one ordered evaluation pass against an opened effect instance.
pub struct ParameterChecker;

impl ParameterChecker {
    /// Evaluate every queued value in order, never short-circuiting on a
    /// failed check, so one broken boundary cannot mask another.
    ///
    /// The instance is left holding the last successfully set value. Any
    /// plugin response outside the success/rejection vocabulary aborts the
    /// pass and propagates.
    pub async fn evaluate(
        effect: &dyn EffectControl,
        values: &[Volume],
    ) -> Result<Vec<ParameterCheck>, EffectError> {
        let mut checks = Vec::with_capacity(values.len());

        for &value in values {
            let start = Instant::now();

            // capability may differ between instances under test; re-fetch
            // rather than caching across the loop
            let descriptor = effect.descriptor().await?;
            let expected = if is_in_range(&value, &descriptor.capability) {
                ExpectedOutcome::Accepted
            } else {
                ExpectedOutcome::Rejected
            };

            let observed = match effect.set_parameter(value).await {
                Ok(()) => {
                    // only read back when acceptance was the right answer
                    let read_back = if expected == ExpectedOutcome::Accepted {
                        Some(effect.get_parameter(value.tag()).await?)
                    } else {
                        None
                    };
                    ObservedOutcome::Accepted { read_back }
                }
                Err(EffectError::IllegalArgument(_)) => ObservedOutcome::Rejected,
                Err(other) => return Err(other),
            };

            let check = ParameterCheck::judge(value, expected, observed, start.elapsed());
            tracing::debug!(
                value = %check.value,
                passed = check.passed,
                "parameter check evaluated"
            );
            checks.push(check);
        }

        Ok(checks)
    }
}
