//! Promise conformance harness
//!
//! Verifies that a patched promise implementation preserves a
//! continuation context across every way a promise can be produced,
//! chained, settled and adopted. Instead of hand-writing hundreds of
//! cases, a harness expands a compact contract description into a
//! matrix of scenarios and registers them with a test runner.
//!
//! # Overview
//!
//! - [`values`] - Canonical fixture value and fresh errors
//! - [`Fixtures`] - Promises settled sync or async, from any constructor
//! - [`Checks`] - Context assertions returning [`CheckError`]
//! - [`matrix`] - Pure scenario builders ([`instance_method_matrix`] and friends)
//! - [`ConformanceHarness`] - Registers matrices against a method under test
//! - [`LocalRunner`] - Runs cases one by one on an [`EventLoopDriver`](core_types::EventLoopDriver)
//! - [`reference`] - The whole suite against the reference runtime
//!
//! # Examples
//!
//! ```
//! use promise_conformance::{matrix, ContractOptions, SlotInfo};
//!
//! let slots = vec![SlotInfo::primary("patched"), SlotInfo::alternate(0, "native", true)];
//! let scenarios = matrix::instance_method_matrix(&ContractOptions::continues(), &slots);
//! assert_eq!(scenarios.len(), 52);
//! ```
//!
//! ```
//! use promise_conformance::{reference, RunConfig};
//!
//! let report = reference::run_reference(&RunConfig::default());
//! assert!(report.is_success(), "{}", report.detailed_summary());
//! ```

#![warn(clippy::all)]

pub mod checks;
pub mod config;
mod engine;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod matrix;
pub mod reference;
pub mod report;
pub mod runner;
pub mod timing;
pub mod values;

pub use checks::{check_settlement, CheckError, Checks, Expectation, Settlement};
pub use config::{AlternateConfig, MatrixSelection, OutputFormat, RunConfig};
pub use error::{HarnessError, HarnessResult};
pub use fixtures::{
    literal_method, throw_method, ConstructorSlot, FixtureSpec, Fixtures, Outcome, Timing,
};
pub use harness::{ConformanceHarness, InstanceMethod, StaticMethod, ValueMethod};
pub use matrix::{
    instance_method_matrix, static_method_matrix, value_matrix, ContractOptions, MatrixStats,
    Scenario, ScenarioKind, SlotInfo,
};
pub use report::{TestReport, TestResult};
pub use runner::{CaseBody, CaseSignals, LocalRunner, Runner};
pub use timing::TimingCoordinator;
pub use values::{make_error, make_value, REJECTION_MESSAGE};
