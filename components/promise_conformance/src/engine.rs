//! Execution engine: registers scenario records with a runner and turns
//! each record into a case body.

use crate::checks::{CheckError, Expectation};
use crate::fixtures::{literal_method, throw_method, ConstructorSlot};
use crate::harness::{ConformanceHarness, InstanceMethod, StaticMethod, ValueMethod};
use crate::matrix::{AttachTiming, ExpectedSettlement, HandlerSpec, Origin, Scenario, ScenarioKind};
use crate::runner::{CaseBody, CaseSignals, Runner};
use crate::values::{make_error, make_value};
use core_types::{Callback, Function, JsError, PromiseConstructor, Value};
use std::cell::Cell;
use std::rc::Rc;

/// The method a matrix is run against.
#[derive(Clone)]
pub(crate) enum Target {
    Instance(InstanceMethod),
    Static(StaticMethod),
    Value(ValueMethod),
}

/// Registers `scenarios` in order, nesting them into groups by path.
pub(crate) fn register(
    harness: &ConformanceHarness,
    runner: &mut dyn Runner,
    scenarios: Vec<Scenario>,
    target: Target,
) {
    let scenarios: Vec<Rc<Scenario>> = scenarios.into_iter().map(Rc::new).collect();
    register_level(harness, runner, &scenarios, 0, &target);
}

fn register_level(
    harness: &ConformanceHarness,
    runner: &mut dyn Runner,
    scenarios: &[Rc<Scenario>],
    depth: usize,
    target: &Target,
) {
    let mut index = 0;
    while index < scenarios.len() {
        let scenario = &scenarios[index];
        if scenario.path.len() == depth {
            tracing::debug!(scenario = %scenario, skipped = scenario.skipped, "registering");
            runner.register_case(
                &scenario.name,
                case_body(harness.clone(), scenario.clone(), target.clone()),
            );
            index += 1;
            continue;
        }

        let group = &scenario.path[depth];
        let len = scenarios[index..]
            .iter()
            .take_while(|s| s.path.len() > depth && &s.path[depth] == group)
            .count();
        let members = &scenarios[index..index + len];
        let skipped = members.iter().all(|s| s.skipped);
        runner.register_group(group, skipped, &mut |inner: &mut dyn Runner| {
            register_level(harness, inner, members, depth + 1, target)
        });
        index += len;
    }
}

fn case_body(harness: ConformanceHarness, scenario: Rc<Scenario>, target: Target) -> CaseBody {
    Box::new(move |signals: Rc<dyn CaseSignals>| {
        tracing::debug!(scenario = %scenario, "running");
        let origin_error = make_error();
        let handler_error = make_error();
        let expectation = expectation(scenario.expected, &origin_error, &handler_error);

        match (scenario.kind, target) {
            (ScenarioKind::NoHandler(origin), Target::Instance(method)) => {
                run_instance(&harness, signals, method, origin, None, origin_error, expectation);
            }
            (ScenarioKind::Ignored(origin), Target::Instance(method)) => {
                let handler = Some(never_called(signals.clone()));
                run_instance(&harness, signals, method, origin, handler, origin_error, expectation);
            }
            (
                ScenarioKind::Handler {
                    origin: Some(origin),
                    handler,
                },
                Target::Instance(method),
            ) => {
                let handler = handler_callback(&harness, handler, &handler_error);
                let (handler, signals) = called_once(handler, signals);
                let handler = Some(handler);
                run_instance(&harness, signals, method, origin, handler, origin_error, expectation);
            }
            (
                ScenarioKind::Handler {
                    origin: None,
                    handler,
                },
                Target::Static(method),
            ) => {
                let handler = handler_callback(&harness, handler, &handler_error);
                let (handler, signals) = called_once(handler, signals);
                let result = method(handler);
                signals.error(harness.checks().check_is_promise(&result).err());
                signals.done(result, expectation);
            }
            (ScenarioKind::Value(spec), Target::Value(method)) => {
                let value = match handler_callback(&harness, spec, &handler_error).call(vec![]) {
                    Ok(value) => value,
                    Err(error) => {
                        signals.error(Some(CheckError::ValueThrew(error.to_string())));
                        return;
                    }
                };
                let result = method(value);
                signals.error(harness.checks().check_is_promise(&result).err());
                signals.done(result, expectation);
            }
            (kind, _) => panic!("scenario {:?} does not fit the registered method shape", kind),
        }
    })
}

fn run_instance(
    harness: &ConformanceHarness,
    signals: Rc<dyn CaseSignals>,
    method: InstanceMethod,
    origin: Origin,
    handler: Option<Callback>,
    origin_error: JsError,
    expectation: Expectation,
) {
    let fixture = origin.fixture;
    let ctor = constructor_for(harness, fixture.constructor);
    let promise = harness
        .fixtures()
        .build(&ctor, fixture.outcome, fixture.timing, Some(origin_error));
    let related = promise.clone();
    let checks = harness.checks().clone();

    harness.timing().exec_async_if(
        move || {
            let result = method(&promise, handler);
            signals.error(checks.check_is_promise(&result).err());
            signals.done(result, expectation);
        },
        origin.attach == AttachTiming::Async,
        &related,
        fixture.is_rejecting(),
    );
}

fn expectation(
    expected: ExpectedSettlement,
    origin_error: &JsError,
    handler_error: &JsError,
) -> Expectation {
    match expected {
        ExpectedSettlement::Fulfilled { value_checked } => {
            Expectation::Fulfilled(value_checked.then(make_value))
        }
        ExpectedSettlement::RejectedWithOrigin => Expectation::Rejected(origin_error.clone()),
        ExpectedSettlement::RejectedWithHandler => Expectation::Rejected(handler_error.clone()),
    }
}

fn handler_callback(harness: &ConformanceHarness, spec: HandlerSpec, error: &JsError) -> Callback {
    match spec {
        HandlerSpec::Literal => literal_method(None),
        HandlerSpec::Throw => throw_method(Some(error.clone())),
        HandlerSpec::Promise(fixture) => {
            let ctor = constructor_for(harness, fixture.constructor);
            harness
                .fixtures()
                .promise_method(&ctor, fixture, Some(error.clone()))
        }
    }
}

/// Skipped scenarios are never executed, so a missing constructor here
/// is a harness bug.
fn constructor_for(
    harness: &ConformanceHarness,
    slot: ConstructorSlot,
) -> Rc<dyn PromiseConstructor> {
    match harness.fixtures().constructor(slot) {
        Some(ctor) => ctor,
        None => panic!("no constructor configured for {:?}", slot),
    }
}

fn never_called(signals: Rc<dyn CaseSignals>) -> Callback {
    Function::named("should not be called", move |_| {
        signals.error(Some(CheckError::UnexpectedHandlerCall));
        Ok(Value::Undefined)
    })
}

/// Wraps a handler that must fire exactly once. A second call fails the
/// case right away; the returned signals check for a missing call once
/// the produced promise settles.
fn called_once(handler: Callback, signals: Rc<dyn CaseSignals>) -> (Callback, Rc<dyn CaseSignals>) {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let sink = signals.clone();
    let wrapper = Function::named(handler.name().to_string(), move |args| {
        counter.set(counter.get() + 1);
        if counter.get() > 1 {
            sink.error(Some(CheckError::HandlerCallCount(counter.get())));
        }
        handler.call(args)
    });
    let signals = CalledOnce {
        inner: signals,
        calls,
    };
    (wrapper, Rc::new(signals))
}

struct CalledOnce {
    inner: Rc<dyn CaseSignals>,
    calls: Rc<Cell<usize>>,
}

impl CaseSignals for CalledOnce {
    fn done(&self, produced: Value, expected: Expectation) {
        if let Some(promise) = produced.as_promise() {
            let calls = self.calls.clone();
            let inner = self.inner.clone();
            let check = Function::named("handler call count", move |_| {
                if calls.get() != 1 {
                    inner.error(Some(CheckError::HandlerCallCount(calls.get())));
                }
                Ok(Value::Undefined)
            });
            promise.then(Some(check.clone()), Some(check));
        }
        self.inner.done(produced, expected);
    }

    fn error(&self, error: Option<CheckError>) {
        self.inner.error(error);
    }
}
