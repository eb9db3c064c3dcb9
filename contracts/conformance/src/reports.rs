//! Conformance run reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Test status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

/// Test category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestCategory {
    Descriptor,
    Parameter,
    Behavioral,
}

impl TestCategory {
    fn order(&self) -> u8 {
        match self {
            TestCategory::Descriptor => 0,
            TestCategory::Parameter => 1,
            TestCategory::Behavioral => 2,
        }
    }
}

impl std::fmt::Display for TestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestCategory::Descriptor => write!(f, "Descriptor"),
            TestCategory::Parameter => write!(f, "Parameter"),
            TestCategory::Behavioral => write!(f, "Behavioral"),
        }
    }
}

/// Individual test result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub duration: Duration,
    pub error: Option<String>,
    pub warnings: Vec<String>,
    pub details: HashMap<String, String>,
}

impl TestResult {
    /// Create a passed test result
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration,
            error: None,
            warnings: Vec::new(),
            details: HashMap::new(),
        }
    }

    /// Create a failed test result
    pub fn failed(name: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration,
            error: Some(error.into()),
            warnings: Vec::new(),
            details: HashMap::new(),
        }
    }

    /// Create a skipped test result
    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            warnings: vec![reason.into()],
            details: HashMap::new(),
        }
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Add a detail to the result
    pub fn add_detail(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.details.insert(key.into(), value.into());
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub conformant: bool,
}

/// Complete conformance report for one effect instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub instance_name: String,
    pub timestamp: DateTime<Utc>,
    pub duration: Duration,
    pub results: HashMap<TestCategory, Vec<TestResult>>,
    pub summary: ReportSummary,
}

impl ConformanceReport {
    /// Create a new report
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
            timestamp: Utc::now(),
            duration: Duration::ZERO,
            results: HashMap::new(),
            summary: ReportSummary::default(),
        }
    }

    /// Add results for a category
    pub fn add_results(&mut self, category: TestCategory, results: Vec<TestResult>) {
        self.results.entry(category).or_default().extend(results);
    }

    /// Whether any recorded result has failed so far
    pub fn has_failures(&self) -> bool {
        self.results
            .values()
            .flatten()
            .any(|result| result.status == TestStatus::Failed)
    }

    /// Finalize the report and compute the summary
    pub fn finalize(&mut self) {
        let mut summary = ReportSummary::default();

        for result in self.results.values().flatten() {
            summary.total += 1;
            match result.status {
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Failed => summary.failed += 1,
                TestStatus::Skipped => summary.skipped += 1,
            }
        }

        summary.conformant = summary.failed == 0;
        self.summary = summary;
    }

    pub fn passed_count(&self) -> usize {
        self.summary.passed
    }

    pub fn failed_count(&self) -> usize {
        self.summary.failed
    }

    pub fn skipped_count(&self) -> usize {
        self.summary.skipped
    }

    pub fn is_conformant(&self) -> bool {
        self.summary.conformant
    }

    /// Render a human-readable text report
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("FXC Effect Conformance Report\n");
        output.push_str("=============================\n");
        output.push_str(&format!("Instance:  {}\n", self.instance_name));
        output.push_str(&format!(
            "Timestamp: {}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("Duration:  {:?}\n", self.duration));

        let mut categories: Vec<_> = self.results.keys().collect();
        categories.sort_by_key(|category| category.order());

        for category in categories {
            output.push_str(&format!("\n{} tests\n", category));
            output.push_str("-----------------------------\n");

            for result in &self.results[category] {
                let icon = match result.status {
                    TestStatus::Passed => "✓",
                    TestStatus::Failed => "✗",
                    TestStatus::Skipped => "○",
                };
                output.push_str(&format!(
                    "  {icon} {:<40} {:>10?}\n",
                    result.name, result.duration
                ));

                if let Some(error) = &result.error {
                    output.push_str(&format!("      error: {error}\n"));
                }
                for warning in &result.warnings {
                    output.push_str(&format!("      warning: {warning}\n"));
                }
            }
        }

        output.push_str("\n-----------------------------\n");
        output.push_str(&format!(
            "Total: {}  Passed: {}  Failed: {}  Skipped: {}\n",
            self.summary.total, self.summary.passed, self.summary.failed, self.summary.skipped
        ));
        output.push_str(if self.summary.conformant {
            "Result: CONFORMANT\n"
        } else {
            "Result: NON-CONFORMANT\n"
        });

        output
    }

    /// Render the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passed_result_has_no_error() {
        let result = TestResult::passed("set_get_level", Duration::from_millis(2));
        assert_eq!(result.status, TestStatus::Passed);
        assert!(result.error.is_none());
    }

    #[test]
    fn failed_result_keeps_the_error() {
        let result = TestResult::failed("set_get_level", "read back differed", Duration::ZERO);
        assert_eq!(result.status, TestStatus::Failed);
        assert_eq!(result.error.as_deref(), Some("read back differed"));
    }

    #[test]
    fn finalize_counts_statuses() {
        let mut report = ConformanceReport::new("reference");
        report.add_results(
            TestCategory::Parameter,
            vec![
                TestResult::passed("a", Duration::ZERO),
                TestResult::failed("b", "boom", Duration::ZERO),
                TestResult::skipped("c", "not applicable"),
            ],
        );
        report.finalize();

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert!(!report.is_conformant());
    }

    #[test]
    fn add_results_appends_within_a_category() {
        let mut report = ConformanceReport::new("reference");
        report.add_results(
            TestCategory::Parameter,
            vec![TestResult::passed("a", Duration::ZERO)],
        );
        report.add_results(
            TestCategory::Parameter,
            vec![TestResult::passed("b", Duration::ZERO)],
        );
        report.finalize();
        assert_eq!(report.summary.total, 2);
    }

    #[test]
    fn has_failures_sees_unfinalized_results() {
        let mut report = ConformanceReport::new("reference");
        assert!(!report.has_failures());
        report.add_results(
            TestCategory::Descriptor,
            vec![TestResult::failed("x", "bad", Duration::ZERO)],
        );
        assert!(report.has_failures());
    }

    #[test]
    fn text_report_names_instance_and_verdict() {
        let mut report = ConformanceReport::new("Implementor_FXC_name_volume");
        report.add_results(
            TestCategory::Descriptor,
            vec![TestResult::passed("metadata_completeness", Duration::ZERO)],
        );
        report.finalize();

        let text = report.to_text();
        assert!(text.contains("Implementor_FXC_name_volume"));
        assert!(text.contains("Result: CONFORMANT"));
    }

    #[test]
    fn json_report_round_trips() {
        let mut report = ConformanceReport::new("reference");
        report.add_results(
            TestCategory::Behavioral,
            vec![TestResult::passed("idempotent_set", Duration::from_millis(1))],
        );
        report.finalize();

        let json = report.to_json().unwrap();
        let parsed: ConformanceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary.total, 1);
        assert!(parsed.is_conformant());
    }
}
