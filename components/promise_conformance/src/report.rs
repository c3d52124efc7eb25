//! Case results and run reports.

use serde::{Deserialize, Serialize};

/// Result of running a single case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TestResult {
    /// Case passed
    Pass,
    /// Case failed with reason
    Fail(String),
    /// Case was skipped with reason
    Skip(String),
    /// Case never signalled completion
    Timeout,
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail(_))
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TestResult::Skip(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TestResult::Timeout)
    }
}

/// Run report with statistics and failure details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Total number of cases run
    pub total: usize,
    /// Number of cases that passed
    pub passed: usize,
    /// Number of cases that failed
    pub failed: usize,
    /// Number of cases that were skipped
    pub skipped: usize,
    /// Number of cases that timed out
    pub timeout: usize,
    /// List of failures with (case, reason)
    pub failures: Vec<(String, String)>,
    /// List of skipped cases with (case, reason)
    pub skips: Vec<(String, String)>,
    /// Cases that never signalled completion
    pub timeouts: Vec<String>,
}

impl TestReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a case result to the report
    pub fn add_result(&mut self, name: &str, result: TestResult) {
        self.total += 1;
        match result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail(reason) => {
                self.failed += 1;
                self.failures.push((name.to_string(), reason));
            }
            TestResult::Skip(reason) => {
                self.skipped += 1;
                self.skips.push((name.to_string(), reason));
            }
            TestResult::Timeout => {
                self.timeout += 1;
                self.timeouts.push(name.to_string());
            }
        }
    }

    /// Calculate the pass rate as a percentage
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Calculate the effective pass rate (excluding skips)
    pub fn effective_pass_rate(&self) -> f64 {
        let executed = self.total - self.skipped;
        if executed == 0 {
            0.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Promise conformance results:\n\
             Total: {}\n\
             Passed: {} ({:.1}%)\n\
             Failed: {}\n\
             Skipped: {}\n\
             Timeout: {}\n\
             Effective Pass Rate: {:.1}%",
            self.total,
            self.passed,
            self.pass_rate(),
            self.failed,
            self.skipped,
            self.timeout,
            self.effective_pass_rate()
        )
    }

    /// Generate a detailed report including failures and timeouts
    pub fn detailed_summary(&self) -> String {
        let mut output = self.summary();

        if !self.failures.is_empty() {
            output.push_str("\n\nFailures:\n");
            for (name, reason) in &self.failures {
                output.push_str(&format!("  - {}\n    Reason: {}\n", name, reason));
            }
        }

        if !self.timeouts.is_empty() {
            output.push_str("\n\nTimeouts:\n");
            for name in &self.timeouts {
                output.push_str(&format!("  - {}\n", name));
            }
        }

        output
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: &TestReport) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.timeout += other.timeout;
        self.failures.extend(other.failures.iter().cloned());
        self.skips.extend(other.skips.iter().cloned());
        self.timeouts.extend(other.timeouts.iter().cloned());
    }

    /// Check if all cases passed (no failures or timeouts)
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.timeout == 0
    }

    /// Export report as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import report from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
