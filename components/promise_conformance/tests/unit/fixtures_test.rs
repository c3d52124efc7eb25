//! Unit tests for the fixture builder

use async_runtime::{EventLoop, PromiseClass};
use core_types::{Callback, Function, PromiseConstructor, Value};
use promise_conformance::{
    literal_method, make_error, make_value, throw_method, ConstructorSlot, FixtureSpec, Fixtures,
    Outcome, Timing,
};
use std::cell::RefCell;
use std::rc::Rc;

struct Setup {
    event_loop: Rc<EventLoop>,
    primary: PromiseClass,
    native: PromiseClass,
    fixtures: Fixtures,
}

fn setup() -> Setup {
    let event_loop = EventLoop::new();
    let primary = PromiseClass::new("primary", event_loop.clone());
    let native = PromiseClass::new("native", event_loop.clone());
    let fixtures = Fixtures::new(Rc::new(primary.clone()), event_loop.clone())
        .with_alternate("native", Some(Rc::new(native.clone())))
        .with_alternate("missing", None);
    Setup {
        event_loop,
        primary,
        native,
        fixtures,
    }
}

/// Attaches recorders to `promise` and returns the shared log.
fn observe(promise: &Value) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let on_ok: Callback = {
        let log = log.clone();
        Function::new(move |args| {
            log.borrow_mut().push(format!("fulfilled:{}", args[0]));
            Ok(Value::Undefined)
        })
    };
    let on_err: Callback = {
        let log = log.clone();
        Function::new(move |args| {
            log.borrow_mut().push(format!("rejected:{}", args[0]));
            Ok(Value::Undefined)
        })
    };
    promise
        .as_promise()
        .expect("fixture is a promise")
        .then(Some(on_ok), Some(on_err));
    log
}

#[test]
fn sync_fixture_is_settled_before_any_turn() {
    let s = setup();
    let promise = s.fixtures.resolve_sync(None);
    let log = observe(&promise);

    // Microtasks only: no scheduler turn has run.
    s.event_loop.run_all_microtasks().unwrap();
    assert_eq!(*log.borrow(), vec!["fulfilled:123".to_string()]);
}

#[test]
fn async_fixture_stays_pending_until_a_turn() {
    let s = setup();
    let promise = s.fixtures.resolve_async(None);
    let log = observe(&promise);

    s.event_loop.run_all_microtasks().unwrap();
    assert!(log.borrow().is_empty());

    s.event_loop.run_until_done().unwrap();
    assert_eq!(*log.borrow(), vec!["fulfilled:123".to_string()]);
}

#[test]
fn rejections_carry_the_supplied_error() {
    let s = setup();
    let error = make_error();
    let sync = s.fixtures.reject_sync(Some(error.clone()));
    let asynchronous = s.fixtures.reject_async(Some(error.clone()));
    let sync_log = observe(&sync);
    let async_log = observe(&asynchronous);

    s.event_loop.run_until_done().unwrap();
    let expected = vec![format!("rejected:{}", error)];
    assert_eq!(*sync_log.borrow(), expected);
    assert_eq!(*async_log.borrow(), expected);
}

#[test]
fn rejection_without_error_makes_a_fresh_one() {
    let s = setup();
    let a = observe(&s.fixtures.reject_sync(None));
    let b = observe(&s.fixtures.reject_sync(None));
    s.event_loop.run_until_done().unwrap();
    assert_ne!(*a.borrow(), *b.borrow());
}

#[test]
fn alt_builders_use_the_given_constructor() {
    let s = setup();
    let native: Rc<dyn PromiseConstructor> = Rc::new(s.native.clone());
    let promise = s.fixtures.resolve_sync_alt(&native, None);
    assert_eq!(promise.as_promise().unwrap().constructor_id(), s.native.id());

    let promise = s.fixtures.reject_async(None);
    assert_eq!(promise.as_promise().unwrap().constructor_id(), s.primary.id());
    observe(&promise);
    s.event_loop.run_until_done().unwrap();
}

#[test]
fn methods_build_a_fresh_promise_per_call() {
    let s = setup();
    let method = s.fixtures.resolve_sync_method(Some(Value::Smi(7)));
    let first = method();
    let second = method();
    assert_ne!(first, second);

    let log = observe(&first);
    s.event_loop.run_until_done().unwrap();
    assert_eq!(*log.borrow(), vec!["fulfilled:7".to_string()]);
}

#[test]
fn error_methods_take_the_error_per_call() {
    let s = setup();
    let method = s.fixtures.reject_sync_method_error();
    let error = make_error();
    let log = observe(&method(Some(error.clone())));
    s.event_loop.run_until_done().unwrap();
    assert_eq!(*log.borrow(), vec![format!("rejected:{}", error)]);
}

#[test]
fn promise_method_follows_its_fixture() {
    let s = setup();
    let native = s.fixtures.constructor(ConstructorSlot::Alternate(0)).unwrap();
    let spec = FixtureSpec {
        outcome: Outcome::Rejected,
        timing: Timing::Async,
        constructor: ConstructorSlot::Alternate(0),
    };
    let error = make_error();
    let handler = s.fixtures.promise_method(&native, spec, Some(error.clone()));

    let promise = handler.call(vec![]).unwrap();
    assert_eq!(promise.as_promise().unwrap().constructor_id(), s.native.id());

    let log = observe(&promise);
    s.event_loop.run_all_microtasks().unwrap();
    assert!(log.borrow().is_empty());
    s.event_loop.run_until_done().unwrap();
    assert_eq!(*log.borrow(), vec![format!("rejected:{}", error)]);
}

#[test]
fn empty_and_unknown_slots_have_no_constructor() {
    let s = setup();
    assert!(s.fixtures.constructor(ConstructorSlot::Primary).is_some());
    assert!(s.fixtures.constructor(ConstructorSlot::Alternate(1)).is_none());
    assert!(s.fixtures.constructor(ConstructorSlot::Alternate(5)).is_none());
    assert_eq!(s.fixtures.slot_name(ConstructorSlot::Primary), "primary");
    assert_eq!(s.fixtures.slot_name(ConstructorSlot::Alternate(1)), "missing");
}

#[test]
fn plain_handlers() {
    assert_eq!(literal_method(None).call(vec![]).unwrap(), make_value());
    let error = make_error();
    assert_eq!(throw_method(Some(error.clone())).call(vec![]).unwrap_err(), error);
}
