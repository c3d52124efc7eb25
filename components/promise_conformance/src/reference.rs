//! The reference suite: every matrix run against the patched promise
//! class of the reference runtime.

use crate::config::{AlternateConfig, RunConfig};
use crate::harness::{ConformanceHarness, InstanceMethod, StaticMethod, ValueMethod};
use crate::matrix::{ContractOptions, MatrixStats};
use crate::report::TestReport;
use crate::runner::{LocalRunner, Runner};
use async_runtime::{ContextNamespace, EventLoop, PromiseClass};
use core_types::{Callback, PromiseConstructor, Value};
use std::rc::Rc;

/// Name of the patched primary constructor.
pub const PRIMARY_NAME: &str = "patched";

/// Event loop, context namespace, patched primary and alternate
/// constructors, all sharing one loop.
pub struct ReferenceRuntime {
    event_loop: Rc<EventLoop>,
    namespace: ContextNamespace,
    patched: PromiseClass,
    alternates: Vec<(String, Option<PromiseClass>)>,
}

impl ReferenceRuntime {
    /// Builds a runtime with one alternate slot per entry of `alternates`;
    /// disabled entries leave their slot empty.
    pub fn new(alternates: &[AlternateConfig]) -> Self {
        let event_loop = EventLoop::new();
        let namespace = ContextNamespace::new("conformance");
        let patched = PromiseClass::patched(PRIMARY_NAME, event_loop.clone(), namespace.clone());
        let alternates = alternates
            .iter()
            .map(|alt| {
                let ctor = alt
                    .enabled
                    .then(|| PromiseClass::new(&alt.name, event_loop.clone()));
                (alt.name.clone(), ctor)
            })
            .collect();
        Self {
            event_loop,
            namespace,
            patched,
            alternates,
        }
    }

    /// The shared event loop.
    pub fn event_loop(&self) -> &Rc<EventLoop> {
        &self.event_loop
    }

    /// The context namespace the patched class binds through.
    pub fn namespace(&self) -> &ContextNamespace {
        &self.namespace
    }

    /// The patched primary constructor.
    pub fn patched(&self) -> &PromiseClass {
        &self.patched
    }

    /// A harness over the patched class with every configured slot.
    pub fn harness(&self) -> ConformanceHarness {
        let mut harness = ConformanceHarness::new(
            Rc::new(self.patched.clone()),
            self.event_loop.clone(),
            Rc::new(self.namespace.clone()),
        );
        for (name, ctor) in &self.alternates {
            let ctor = ctor
                .clone()
                .map(|ctor| Rc::new(ctor) as Rc<dyn PromiseConstructor>);
            harness = harness.with_alternate(name, ctor);
        }
        harness
    }

    /// A local runner driving this runtime's loop. Binding records are
    /// cleared before every case.
    pub fn runner(&self) -> LocalRunner {
        let namespace = self.namespace.clone();
        LocalRunner::new(self.event_loop.clone())
            .with_case_reset(move || namespace.reset_bindings())
    }
}

/// `promise.then(handler)`
pub fn then_method() -> InstanceMethod {
    Rc::new(|promise: &Value, handler: Option<Callback>| match promise.as_promise() {
        Some(promise) => promise.then(handler, None),
        None => Value::Undefined,
    })
}

/// `promise.catch(handler)`
pub fn catch_method() -> InstanceMethod {
    Rc::new(|promise: &Value, handler: Option<Callback>| match promise.as_promise() {
        Some(promise) => promise.then(None, handler),
        None => Value::Undefined,
    })
}

/// `promise.then(handler, handler)`
pub fn then_both_method() -> InstanceMethod {
    Rc::new(|promise: &Value, handler: Option<Callback>| match promise.as_promise() {
        Some(promise) => promise.then(handler.clone(), handler),
        None => Value::Undefined,
    })
}

/// `Promise.try(handler)` on `class`
pub fn try_method(class: &PromiseClass) -> StaticMethod {
    let class = class.clone();
    Rc::new(move |handler: Callback| class.try_call(&handler))
}

/// `Promise.resolve(value)` on `class`
pub fn resolve_method(class: &PromiseClass) -> ValueMethod {
    let class = class.clone();
    Rc::new(move |value: Value| class.resolve(value))
}

/// Registers the selected matrices, one top-level group per method.
/// Returns each group's name with its matrix counts.
pub fn register_suite(
    runtime: &ReferenceRuntime,
    config: &RunConfig,
    runner: &mut dyn Runner,
) -> Vec<(&'static str, MatrixStats)> {
    let harness = runtime.harness();
    let selection = config.matrices;
    let with_undefined = |options: ContractOptions| ContractOptions {
        no_undefined: config.no_undefined,
        ..options
    };

    let mut instance: Vec<(&'static str, InstanceMethod, ContractOptions)> = Vec::new();
    if selection.then {
        let options = with_undefined(ContractOptions::continues());
        instance.push(("Promise.prototype.then", then_method(), options));
    }
    if selection.catch {
        let options = with_undefined(ContractOptions::catches());
        instance.push(("Promise.prototype.catch", catch_method(), options));
    }
    if selection.then_both {
        let options = with_undefined(ContractOptions {
            continues: true,
            catches: true,
            ..ContractOptions::default()
        });
        let name = "Promise.prototype.then with both handlers";
        instance.push((name, then_both_method(), options));
    }

    let mut registered = Vec::new();
    for (name, method, options) in instance {
        let mut stats = MatrixStats::default();
        runner.register_group(name, false, &mut |inner: &mut dyn Runner| {
            stats = harness.instance_method_returns_promise(inner, method.clone(), options);
        });
        registered.push((name, stats));
    }

    if selection.try_call {
        let name = "Promise.try";
        let method = try_method(runtime.patched());
        let mut stats = MatrixStats::default();
        runner.register_group(name, false, &mut |inner: &mut dyn Runner| {
            stats = harness.static_method_returns_promise(inner, method.clone());
        });
        registered.push((name, stats));
    }

    if selection.resolve {
        let name = "Promise.resolve";
        let method = resolve_method(runtime.patched());
        let mut stats = MatrixStats::default();
        runner.register_group(name, false, &mut |inner: &mut dyn Runner| {
            stats = harness.value_returns_promise(inner, method.clone());
        });
        registered.push((name, stats));
    }

    for (name, stats) in &registered {
        tracing::info!(method = %name, total = stats.total, skipped = stats.skipped, "registered");
    }
    registered
}

/// Builds a reference runtime from `config`, runs the selected matrices
/// and returns the report.
pub fn run_reference(config: &RunConfig) -> TestReport {
    let runtime = ReferenceRuntime::new(&config.alternates);
    let mut runner = runtime.runner();
    register_suite(&runtime, config, &mut runner);
    runner.run()
}
