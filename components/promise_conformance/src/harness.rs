//! The conformance harness: fixtures, checks and timing bound to one
//! primary constructor, plus the three matrix entry points.

use crate::checks::{CheckError, Checks};
use crate::engine::{self, Target};
use crate::fixtures::{ConstructorSlot, Fixtures};
use crate::matrix::{
    instance_method_matrix, static_method_matrix, value_matrix, ContractOptions, MatrixStats,
    SlotInfo,
};
use crate::runner::Runner;
use crate::timing::TimingCoordinator;
use core_types::{
    Callback, ContextId, ContextProvider, FunctionId, PromiseConstructor, Scheduler, Value,
};
use std::rc::Rc;

/// An instance method under test: calls the method on `promise` with
/// `handler` (or none) and returns the result, e.g. `promise.then(handler)`.
pub type InstanceMethod = Rc<dyn Fn(&Value, Option<Callback>) -> Value>;

/// A static method taking a callback, e.g. `Promise.try(handler)`.
pub type StaticMethod = Rc<dyn Fn(Callback) -> Value>;

/// A static method taking a value, e.g. `Promise.resolve(value)`.
pub type ValueMethod = Rc<dyn Fn(Value) -> Value>;

/// Harness bound to one promise implementation.
///
/// Cheap to clone; every registered case captures a clone.
#[derive(Clone)]
pub struct ConformanceHarness {
    fixtures: Fixtures,
    checks: Checks,
    timing: TimingCoordinator,
}

impl ConformanceHarness {
    /// Binds the harness to `primary`. `scheduler` defers async fixtures
    /// and attachments; `context` answers the binding checks.
    pub fn new(
        primary: Rc<dyn PromiseConstructor>,
        scheduler: Rc<dyn Scheduler>,
        context: Rc<dyn ContextProvider>,
    ) -> Self {
        Self {
            checks: Checks::new(primary.as_ref(), context),
            fixtures: Fixtures::new(primary, scheduler.clone()),
            timing: TimingCoordinator::new(scheduler),
        }
    }

    /// Adds an alternate constructor slot. `None` keeps the slot in the
    /// matrix with its cases skipped.
    pub fn with_alternate(
        mut self,
        name: &str,
        constructor: Option<Rc<dyn PromiseConstructor>>,
    ) -> Self {
        self.fixtures = self.fixtures.with_alternate(name, constructor);
        self
    }

    /// Fixture builder for the primary and alternate constructors.
    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Assertion helpers.
    pub fn checks(&self) -> &Checks {
        &self.checks
    }

    /// Timing coordinator on the harness scheduler.
    pub fn timing(&self) -> &TimingCoordinator {
        &self.timing
    }

    /// Primary slot first, then each alternate slot.
    pub fn slots(&self) -> Vec<SlotInfo> {
        let primary = self.fixtures.slot_name(ConstructorSlot::Primary);
        let mut slots = vec![SlotInfo::primary(&primary)];
        slots.extend(self.fixtures.alternates().iter().enumerate().map(|(index, alt)| {
            SlotInfo::alternate(index, &alt.name, alt.constructor.is_some())
        }));
        slots
    }

    /// Registers the instance-method matrix for `method` under `options`
    /// and returns its counts.
    pub fn instance_method_returns_promise(
        &self,
        runner: &mut dyn Runner,
        method: InstanceMethod,
        options: ContractOptions,
    ) -> MatrixStats {
        let scenarios = instance_method_matrix(&options, &self.slots());
        let stats = MatrixStats::of(&scenarios);
        tracing::info!(
            ?options,
            total = stats.total,
            skipped = stats.skipped,
            "instance-method matrix"
        );
        engine::register(self, runner, scenarios, Target::Instance(method));
        stats
    }

    /// Registers the static-method-with-callback matrix for `method`.
    pub fn static_method_returns_promise(
        &self,
        runner: &mut dyn Runner,
        method: StaticMethod,
    ) -> MatrixStats {
        let scenarios = static_method_matrix(&self.slots());
        let stats = MatrixStats::of(&scenarios);
        tracing::info!(total = stats.total, skipped = stats.skipped, "static-method matrix");
        engine::register(self, runner, scenarios, Target::Static(method));
        stats
    }

    /// Registers the static-method-with-value matrix for `method`.
    pub fn value_returns_promise(
        &self,
        runner: &mut dyn Runner,
        method: ValueMethod,
    ) -> MatrixStats {
        let scenarios = value_matrix(&self.slots());
        let stats = MatrixStats::of(&scenarios);
        tracing::info!(total = stats.total, skipped = stats.skipped, "value matrix");
        engine::register(self, runner, scenarios, Target::Value(method));
        stats
    }

    /// See [`Checks::check_is_promise`].
    pub fn check_is_promise(&self, value: &Value) -> Result<(), CheckError> {
        self.checks.check_is_promise(value)
    }

    /// See [`Checks::check_bound`].
    pub fn check_bound(
        &self,
        function: FunctionId,
        context: ContextId,
        expected: Option<usize>,
    ) -> Result<(), CheckError> {
        self.checks.check_bound(function, context, expected)
    }

    /// See [`Checks::check_not_bound`].
    pub fn check_not_bound(&self, function: FunctionId) -> Result<(), CheckError> {
        self.checks.check_not_bound(function)
    }

    /// See [`Checks::check_run_context`].
    pub fn check_run_context(&self, context: ContextId) -> Result<(), CheckError> {
        self.checks.check_run_context(context)
    }
}
