//! Integration tests: whole matrices run against the reference runtime

mod broken_targets_test;
mod context_test;
mod reference_suite_test;

pub use promise_conformance::reference::ReferenceRuntime;
use promise_conformance::{AlternateConfig, TestReport};

/// One enabled alternate ("native") and one empty slot ("legacy").
pub fn runtime() -> ReferenceRuntime {
    ReferenceRuntime::new(&[
        AlternateConfig {
            name: "native".to_string(),
            enabled: true,
        },
        AlternateConfig {
            name: "legacy".to_string(),
            enabled: false,
        },
    ])
}

/// Every failure reason in `report`, for assertion messages.
pub fn failures(report: &TestReport) -> String {
    report
        .failures
        .iter()
        .map(|(name, reason)| format!("{}: {}", name, reason))
        .collect::<Vec<_>>()
        .join("\n")
}
