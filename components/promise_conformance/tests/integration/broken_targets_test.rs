use super::runtime;
use async_runtime::PromiseClass;
use core_types::{Callback, Value};
use promise_conformance::reference::{then_both_method, then_method};
use promise_conformance::{ContractOptions, InstanceMethod, StaticMethod, ValueMethod};
use std::rc::Rc;

fn reasons(report: &promise_conformance::TestReport) -> Vec<&str> {
    report.failures.iter().map(|(_, reason)| reason.as_str()).collect()
}

#[test]
fn non_promise_result_fails_every_case() {
    let rt = runtime();
    let mut runner = rt.runner();
    let method: InstanceMethod = Rc::new(|_: &Value, _: Option<Callback>| Value::Smi(123));
    rt.harness()
        .instance_method_returns_promise(&mut runner, method, ContractOptions::continues());

    let report = runner.run();
    assert_eq!(report.failed, 52);
    assert!(reasons(&report).iter().all(|r| *r == "Did not return promise"));
}

#[test]
fn foreign_constructor_result_fails() {
    let rt = runtime();
    let foreign = PromiseClass::new("foreign", rt.event_loop().clone());
    let then = then_method();
    let method: InstanceMethod = Rc::new(move |promise: &Value, handler: Option<Callback>| {
        foreign.resolve(then(promise, handler))
    });
    let mut runner = rt.runner();
    rt.harness()
        .instance_method_returns_promise(&mut runner, method, ContractOptions::continues());

    let report = runner.run();
    assert_eq!(report.failed, 52);
    assert!(reasons(&report)
        .iter()
        .all(|r| *r == "Did not return promise from correct constructor"));
}

#[test]
fn handler_firing_on_the_wrong_branch_is_caught() {
    let rt = runtime();
    let mut runner = rt.runner();
    rt.harness().instance_method_returns_promise(
        &mut runner,
        then_both_method(),
        ContractOptions::continues(),
    );

    let report = runner.run();
    assert_eq!(report.failed, 4);
    assert!(report.failures.iter().all(|(name, reason)| {
        name.ends_with("is ignored") && reason == "Handler should not be called"
    }));
}

#[test]
fn catch_that_never_calls_the_handler_fails_under_pass_through() {
    let rt = runtime();
    let mut runner = rt.runner();
    // Settles like a pass-through catch, but drops the handler.
    let method: InstanceMethod = Rc::new(|promise: &Value, _: Option<Callback>| {
        promise.as_promise().unwrap().then(None, None)
    });
    let options = ContractOptions {
        pass_through: true,
        ..ContractOptions::catches()
    };
    rt.harness()
        .instance_method_returns_promise(&mut runner, method, options);

    let report = runner.run();
    // Four rejecting branches, each with ten runnable handler leaves.
    assert_eq!(report.failed, 4 * 10);
    assert_eq!(report.passed, 12);
    assert!(reasons(&report)
        .iter()
        .all(|r| *r == "Handler called 0 times, expected once"));
}

#[test]
fn then_that_calls_the_handler_twice_fails() {
    let rt = runtime();
    let mut runner = rt.runner();
    let method: InstanceMethod = Rc::new(|promise: &Value, handler: Option<Callback>| {
        let promise = promise.as_promise().unwrap().clone();
        if let Some(handler) = handler.clone() {
            let quiet = promise_conformance::literal_method(None);
            promise
                .then(Some(handler), None)
                .as_promise()
                .unwrap()
                .then(None, Some(quiet));
        }
        promise.then(handler, None)
    });
    rt.harness()
        .instance_method_returns_promise(&mut runner, method, ContractOptions::continues());

    let report = runner.run();
    assert_eq!(report.failed, 4 * 10);
    assert!(report
        .failures
        .iter()
        .all(|(name, _)| name.contains("> returns >")));
    assert!(reasons(&report)
        .iter()
        .all(|r| *r == "Handler called 2 times, expected once"));
}

#[test]
fn static_method_calling_the_handler_twice_fails() {
    let rt = runtime();
    let mut runner = rt.runner();
    let class = rt.patched().clone();
    let method: StaticMethod = Rc::new(move |handler: Callback| {
        let _ = handler.call(vec![]);
        class.try_call(&handler)
    });
    rt.harness().static_method_returns_promise(&mut runner, method);

    let report = runner.run();
    assert_eq!(report.skipped, 4);
    assert_eq!(report.failed, 10);
    assert!(reasons(&report)
        .iter()
        .all(|r| *r == "Handler called 2 times, expected once"));
}

#[test]
fn swallowed_handler_outcome_fails_settlement() {
    let rt = runtime();
    let mut runner = rt.runner();
    // Calls the handler but settles with the input value regardless.
    let method: InstanceMethod = Rc::new(|promise: &Value, handler: Option<Callback>| {
        let promise = promise.as_promise().unwrap().clone();
        let followed = promise.then(None, None);
        if let Some(handler) = handler {
            let quiet = promise_conformance::literal_method(None);
            promise
                .then(Some(handler), None)
                .as_promise()
                .unwrap()
                .then(None, Some(quiet));
        }
        followed
    });
    rt.harness()
        .instance_method_returns_promise(&mut runner, method, ContractOptions::continues());

    let report = runner.run();
    assert!(!report.is_success());
    // Only handlers that end in an error can be told apart from the input.
    assert!(report
        .failures
        .iter()
        .all(|(name, reason)| (name.ends_with("rejected sync")
            || name.ends_with("rejected async")
            || name.ends_with("thrown error"))
            && reason.starts_with("Expected promise to be rejected with")));
    // Four handler sub-matrices, each with a thrown error and two
    // rejecting fixtures from each of the two configured constructors.
    assert_eq!(report.failed, 4 * (1 + 2 * 2));
}

#[test]
fn static_method_returning_the_handler_result_fails() {
    let rt = runtime();
    let mut runner = rt.runner();
    let method: StaticMethod =
        Rc::new(|handler: Callback| handler.call(vec![]).unwrap_or(Value::Undefined));
    rt.harness().static_method_returns_promise(&mut runner, method);

    let report = runner.run();
    // Only a primary-constructor promise returned by the handler looks right.
    assert_eq!(report.passed, 4);
    assert_eq!(report.skipped, 4);
    assert_eq!(report.failed, 6);
}

#[test]
fn value_method_returning_its_input_fails_for_foreign_values() {
    let rt = runtime();
    let mut runner = rt.runner();
    let method: ValueMethod = Rc::new(|value: Value| value);
    rt.harness().value_returns_promise(&mut runner, method);

    let report = runner.run();
    assert_eq!(report.passed, 4);
    assert_eq!(report.failed, 5);
    assert_eq!(reasons(&report)[0], "Did not return promise");
}
