use super::{failures, runtime};
use async_runtime::PromiseClass;
use core_types::{Callback, Function, Value};
use promise_conformance::{make_value, CaseSignals, Expectation, Runner};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn attachment_binds_once_to_the_active_context() {
    let rt = runtime();
    let harness = rt.harness();
    let ns = rt.namespace();
    let ctx = ns.create_context();
    let handler = Function::new(|args| Ok(args[0].clone()));

    let origin = harness.fixtures().resolve_sync(None);
    ns.run(ctx, || {
        origin.as_promise().unwrap().then(Some(handler.clone()), None);
    });

    assert_eq!(harness.check_bound(handler.id(), ctx, None), Ok(()));
    let other = ns.create_context();
    assert!(harness.check_bound(handler.id(), other, None).is_err());
    rt.event_loop().run_until_done().unwrap();
}

#[test]
fn attachment_outside_a_context_binds_nothing() {
    let rt = runtime();
    let harness = rt.harness();
    let handler = Function::new(|_| Ok(Value::Undefined));
    harness
        .fixtures()
        .resolve_sync(None)
        .as_promise()
        .unwrap()
        .then(Some(handler.clone()), None);
    assert_eq!(harness.check_not_bound(handler.id()), Ok(()));
    rt.event_loop().run_until_done().unwrap();
}

/// Registers a case attaching a context-checking handler inside a fresh
/// context, to a promise built by `class`.
fn register_run_context_case(
    runner: &mut dyn Runner,
    rt: &super::ReferenceRuntime,
    class: PromiseClass,
) {
    let harness = rt.harness();
    let ns = rt.namespace().clone();
    runner.register_case(
        "handler runs in the attachment context",
        Box::new(move |signals: Rc<dyn CaseSignals>| {
            let ctx = ns.create_context();
            let sink = signals.clone();
            let checks = harness.checks().clone();
            let handler: Callback = Function::new(move |args| {
                sink.error(checks.check_run_context(ctx).err());
                Ok(args[0].clone())
            });
            let origin = class.resolve(make_value());
            let result = ns.run(ctx, || origin.as_promise().unwrap().then(Some(handler), None));
            signals.done(result, Expectation::Fulfilled(Some(make_value())));
        }),
    );
}

#[test]
fn patched_handler_runs_in_its_context() {
    let rt = runtime();
    let mut runner = rt.runner();
    register_run_context_case(&mut runner, &rt, rt.patched().clone());
    let report = runner.run();
    assert!(report.is_success(), "{}", failures(&report));
}

#[test]
fn unpatched_handler_loses_its_context() {
    let rt = runtime();
    let mut runner = rt.runner();
    let plain = PromiseClass::new("plain", rt.event_loop().clone());
    register_run_context_case(&mut runner, &rt, plain);
    let report = runner.run();
    assert_eq!(report.failed, 1);
    assert!(report.failures[0].1.starts_with("Function run in wrong context"));
    assert!(report.failures[0].1.ends_with("got: none)"));
}

#[test]
fn firing_handler_is_called_exactly_once() {
    let rt = runtime();
    let harness = rt.harness();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let handler = Function::new(move |args| {
        counter.set(counter.get() + 1);
        Ok(args[0].clone())
    });

    for origin in [
        harness.fixtures().resolve_sync(None),
        harness.fixtures().resolve_async(None),
    ] {
        origin.as_promise().unwrap().then(Some(handler.clone()), Some(handler.clone()));
    }
    rt.event_loop().run_until_done().unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn binding_checks_see_only_the_current_case() {
    let rt = runtime();
    let mut runner = rt.runner();
    for name in ["first", "second"] {
        let harness = rt.harness();
        let ns = rt.namespace().clone();
        let class = rt.patched().clone();
        runner.register_case(
            name,
            Box::new(move |signals: Rc<dyn CaseSignals>| {
                let ctx = ns.create_context();
                let handler = Function::new(|args| Ok(args[0].clone()));
                let origin = class.resolve(make_value());
                let result = ns.run(ctx, || {
                    origin.as_promise().unwrap().then(Some(handler.clone()), None)
                });
                signals.error(harness.check_bound(handler.id(), ctx, None).err());
                signals.done(result, Expectation::Fulfilled(Some(make_value())));
            }),
        );
    }

    let report = runner.run();
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.passed, 2);
}
