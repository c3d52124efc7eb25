//! Unit tests for the local runner

use async_runtime::{EventLoop, PromiseClass};
use core_types::Value;
use promise_conformance::{
    make_error, make_value, CaseSignals, CheckError, Expectation, LocalRunner, Runner, TestResult,
};
use std::cell::Cell;
use std::rc::Rc;

fn setup() -> (Rc<EventLoop>, PromiseClass, LocalRunner) {
    let event_loop = EventLoop::new();
    let class = PromiseClass::new("native", event_loop.clone());
    let runner = LocalRunner::new(event_loop.clone());
    (event_loop, class, runner)
}

fn only_result(runner: &mut LocalRunner) -> TestResult {
    let report = runner.run();
    assert_eq!(report.total, 1);
    if report.passed == 1 {
        TestResult::Pass
    } else if let Some((_, reason)) = report.failures.first() {
        TestResult::Fail(reason.clone())
    } else if let Some((_, reason)) = report.skips.first() {
        TestResult::Skip(reason.clone())
    } else {
        TestResult::Timeout
    }
}

#[test]
fn matching_settlement_passes() {
    let (_, class, mut runner) = setup();
    runner.register_case(
        "fulfils",
        Box::new(move |signals: Rc<dyn CaseSignals>| {
            signals.done(class.resolve(make_value()), Expectation::Fulfilled(Some(make_value())));
        }),
    );
    assert_eq!(only_result(&mut runner), TestResult::Pass);
}

#[test]
fn rejection_must_match_by_identity() {
    let (_, class, mut runner) = setup();
    runner.register_case(
        "rejects with another error",
        Box::new(move |signals: Rc<dyn CaseSignals>| {
            let produced = class.reject(make_error());
            signals.done(produced, Expectation::Rejected(make_error()));
        }),
    );
    let result = only_result(&mut runner);
    match result {
        TestResult::Fail(reason) => {
            assert!(reason.starts_with("Expected promise to be rejected with"))
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn error_sink_fails_and_sticks() {
    let (_, class, mut runner) = setup();
    runner.register_case(
        "error then done",
        Box::new(move |signals: Rc<dyn CaseSignals>| {
            signals.error(None);
            signals.error(Some(CheckError::NotPromise));
            signals.done(class.resolve(make_value()), Expectation::Fulfilled(None));
        }),
    );
    assert_eq!(
        only_result(&mut runner),
        TestResult::Fail("Did not return promise".to_string())
    );
}

#[test]
fn done_needs_a_promise() {
    let (_, _, mut runner) = setup();
    runner.register_case(
        "not awaitable",
        Box::new(|signals: Rc<dyn CaseSignals>| {
            signals.done(make_value(), Expectation::Fulfilled(None));
        }),
    );
    assert_eq!(
        only_result(&mut runner),
        TestResult::Fail("Expected a promise to await but got 123".to_string())
    );
}

#[test]
fn silent_case_times_out() {
    let (_, _, mut runner) = setup();
    runner.register_case("silent", Box::new(|_signals: Rc<dyn CaseSignals>| {}));
    assert_eq!(only_result(&mut runner), TestResult::Timeout);
}

#[test]
fn never_settling_promise_times_out() {
    let (_, class, mut runner) = setup();
    runner.register_case(
        "pending forever",
        Box::new(move |signals: Rc<dyn CaseSignals>| {
            let pending = Value::Promise(class.new_pending());
            signals.done(pending, Expectation::Fulfilled(None));
        }),
    );
    let report = runner.run();
    assert_eq!(report.timeout, 1);
    assert_eq!(report.timeouts, vec!["pending forever".to_string()]);
    assert!(!report.is_success());
}

#[test]
fn unhandled_rejection_fails_a_passing_case() {
    let (_, class, mut runner) = setup();
    runner.register_case(
        "leaks a rejection",
        Box::new(move |signals: Rc<dyn CaseSignals>| {
            let _ = class.reject(make_error());
            signals.done(class.resolve(make_value()), Expectation::Fulfilled(None));
        }),
    );
    match only_result(&mut runner) {
        TestResult::Fail(reason) => assert!(reason.starts_with("Unhandled rejection: ")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn skipped_groups_skip_their_cases() {
    let (_, class, mut runner) = setup();
    runner.register_group("outer", false, &mut |outer: &mut dyn Runner| {
        let class = class.clone();
        outer.register_group("skipped", true, &mut |inner: &mut dyn Runner| {
            let body = Box::new(|_: Rc<dyn CaseSignals>| panic!("skipped case ran"));
            inner.register_case("never runs", body);
        });
        outer.register_case(
            "runs",
            Box::new(move |signals: Rc<dyn CaseSignals>| {
                signals.done(class.resolve(make_value()), Expectation::Fulfilled(None));
            }),
        );
    });

    assert_eq!(
        runner.case_names(),
        vec!["outer > skipped > never runs".to_string(), "outer > runs".to_string()]
    );
    let report = runner.run();
    assert_eq!(report.passed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.skips[0].0, "outer > skipped > never runs");
}

#[test]
fn cases_run_in_registration_order() {
    let (_, class, mut runner) = setup();
    for name in ["first", "second", "third"] {
        let class = class.clone();
        runner.register_case(
            name,
            Box::new(move |signals: Rc<dyn CaseSignals>| {
                signals.done(class.resolve(make_value()), Expectation::Fulfilled(None));
            }),
        );
    }
    assert_eq!(runner.case_count(), 3);
    let report = runner.run();
    assert_eq!(report.passed, 3);
    assert_eq!(runner.case_count(), 0);
}

#[test]
fn reset_hook_runs_before_every_case() {
    let (_, class, runner) = setup();
    let resets = Rc::new(Cell::new(0));
    let counter = resets.clone();
    let mut runner = runner.with_case_reset(move || counter.set(counter.get() + 1));

    for name in ["first", "second"] {
        let class = class.clone();
        let seen = resets.clone();
        runner.register_case(
            name,
            Box::new(move |signals: Rc<dyn CaseSignals>| {
                assert!(seen.get() > 0);
                signals.done(class.resolve(make_value()), Expectation::Fulfilled(None));
            }),
        );
    }
    runner.register_group("skipped", true, &mut |inner: &mut dyn Runner| {
        inner.register_case("never runs", Box::new(|_: Rc<dyn CaseSignals>| {}));
    });

    let report = runner.run();
    assert_eq!(report.passed, 2);
    assert_eq!(resets.get(), 2);
}
