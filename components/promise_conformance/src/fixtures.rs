//! Promise fixture builder.
//!
//! Builds promises, and functions returning promises, that resolve or
//! reject either synchronously (before the constructor call returns) or
//! asynchronously (after one scheduler turn), from the primary
//! constructor or any alternate one. Also builds plain handlers that
//! return a literal or throw.
//!
//! Fixture builders never fail: a panic escaping from here is a harness
//! bug and aborts the run.

use crate::values::{make_error, make_value};
use core_types::{Callback, Function, JsError, PromiseConstructor, Scheduler, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// How a fixture settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Fulfils with a value
    Resolved,
    /// Rejects with an error
    Rejected,
}

/// When a fixture settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timing {
    /// Inside the executor, before the constructor returns
    Sync,
    /// After one scheduler turn
    Async,
}

/// Which constructor a fixture is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorSlot {
    /// The constructor under test
    Primary,
    /// The n-th configured alternate constructor
    Alternate(usize),
}

/// Full description of one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureSpec {
    /// Settlement outcome
    pub outcome: Outcome,
    /// Settlement timing
    pub timing: Timing,
    /// Producing constructor
    pub constructor: ConstructorSlot,
}

impl FixtureSpec {
    /// A fixture from the primary constructor.
    pub fn primary(outcome: Outcome, timing: Timing) -> Self {
        Self {
            outcome,
            timing,
            constructor: ConstructorSlot::Primary,
        }
    }

    /// Returns true for rejecting fixtures.
    pub fn is_rejecting(&self) -> bool {
        self.outcome == Outcome::Rejected
    }

    /// The four outcome/timing combinations, in matrix order.
    pub fn settlements(constructor: ConstructorSlot) -> [FixtureSpec; 4] {
        [
            (Outcome::Resolved, Timing::Sync),
            (Outcome::Resolved, Timing::Async),
            (Outcome::Rejected, Timing::Sync),
            (Outcome::Rejected, Timing::Async),
        ]
        .map(|(outcome, timing)| FixtureSpec {
            outcome,
            timing,
            constructor,
        })
    }
}

impl fmt::Display for FixtureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            Outcome::Resolved => "resolved",
            Outcome::Rejected => "rejected",
        };
        let timing = match self.timing {
            Timing::Sync => "sync",
            Timing::Async => "async",
        };
        write!(f, "{} {}", outcome, timing)
    }
}

/// A zero-argument function returning a fresh fixture promise.
pub type PromiseMethod = Rc<dyn Fn() -> Value>;

/// A function returning a fresh rejecting fixture for a supplied error.
pub type ErrorPromiseMethod = Rc<dyn Fn(Option<JsError>) -> Value>;

/// A named alternate constructor slot. An empty slot keeps its place in
/// the matrix; its scenarios are registered as skipped.
#[derive(Clone)]
pub struct AlternateConstructor {
    /// Display name used in group names
    pub name: String,
    /// The constructor, if one is configured
    pub constructor: Option<Rc<dyn PromiseConstructor>>,
}

impl fmt::Debug for AlternateConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlternateConstructor")
            .field("name", &self.name)
            .field("configured", &self.constructor.is_some())
            .finish()
    }
}

/// Builds fixture promises and handlers.
#[derive(Clone)]
pub struct Fixtures {
    primary: Rc<dyn PromiseConstructor>,
    alternates: Vec<AlternateConstructor>,
    scheduler: Rc<dyn Scheduler>,
}

impl Fixtures {
    /// Creates a builder for `primary` with no alternates.
    pub fn new(primary: Rc<dyn PromiseConstructor>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            primary,
            alternates: Vec::new(),
            scheduler,
        }
    }

    /// Adds an alternate constructor slot.
    pub fn with_alternate(
        mut self,
        name: &str,
        constructor: Option<Rc<dyn PromiseConstructor>>,
    ) -> Self {
        self.alternates.push(AlternateConstructor {
            name: name.to_string(),
            constructor,
        });
        self
    }

    /// The constructor under test.
    pub fn primary(&self) -> &Rc<dyn PromiseConstructor> {
        &self.primary
    }

    /// Configured alternate slots, in order.
    pub fn alternates(&self) -> &[AlternateConstructor] {
        &self.alternates
    }

    /// Resolves a slot to its constructor; `None` for an empty or unknown
    /// alternate slot.
    pub fn constructor(&self, slot: ConstructorSlot) -> Option<Rc<dyn PromiseConstructor>> {
        match slot {
            ConstructorSlot::Primary => Some(self.primary.clone()),
            ConstructorSlot::Alternate(index) => self
                .alternates
                .get(index)
                .and_then(|alt| alt.constructor.clone()),
        }
    }

    /// Display name of a slot.
    pub fn slot_name(&self, slot: ConstructorSlot) -> String {
        match slot {
            ConstructorSlot::Primary => self.primary.name().to_string(),
            ConstructorSlot::Alternate(index) => self
                .alternates
                .get(index)
                .map(|alt| alt.name.clone())
                .unwrap_or_else(|| format!("alternate {}", index)),
        }
    }

    /// A promise from `ctor` resolved in the same turn with `value`
    /// (default: [`make_value`]).
    pub fn resolve_sync_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        value: Option<Value>,
    ) -> Value {
        let value = value.unwrap_or_else(make_value);
        ctor.construct(Box::new(move |resolve, _reject| resolve(value)))
    }

    /// A promise from `ctor` resolved one scheduler turn later.
    pub fn resolve_async_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        value: Option<Value>,
    ) -> Value {
        let value = value.unwrap_or_else(make_value);
        let scheduler = self.scheduler.clone();
        ctor.construct(Box::new(move |resolve, _reject| {
            scheduler.defer_one_turn(Box::new(move || resolve(value)));
        }))
    }

    /// A promise from `ctor` rejected in the same turn with `error`
    /// (default: a fresh [`make_error`]).
    pub fn reject_sync_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        error: Option<JsError>,
    ) -> Value {
        let error = error.unwrap_or_else(make_error);
        ctor.construct(Box::new(move |_resolve, reject| reject(error)))
    }

    /// A promise from `ctor` rejected one scheduler turn later.
    pub fn reject_async_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        error: Option<JsError>,
    ) -> Value {
        let error = error.unwrap_or_else(make_error);
        let scheduler = self.scheduler.clone();
        ctor.construct(Box::new(move |_resolve, reject| {
            scheduler.defer_one_turn(Box::new(move || reject(error)));
        }))
    }

    /// [`Fixtures::resolve_sync_alt`] on the primary constructor.
    pub fn resolve_sync(&self, value: Option<Value>) -> Value {
        self.resolve_sync_alt(&self.primary, value)
    }

    /// [`Fixtures::resolve_async_alt`] on the primary constructor.
    pub fn resolve_async(&self, value: Option<Value>) -> Value {
        self.resolve_async_alt(&self.primary, value)
    }

    /// [`Fixtures::reject_sync_alt`] on the primary constructor.
    pub fn reject_sync(&self, error: Option<JsError>) -> Value {
        self.reject_sync_alt(&self.primary, error)
    }

    /// [`Fixtures::reject_async_alt`] on the primary constructor.
    pub fn reject_async(&self, error: Option<JsError>) -> Value {
        self.reject_async_alt(&self.primary, error)
    }

    /// Builds the fixture described by `outcome` and `timing` from `ctor`.
    /// `error` is used for rejections and ignored for resolutions.
    pub fn build(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        outcome: Outcome,
        timing: Timing,
        error: Option<JsError>,
    ) -> Value {
        match (outcome, timing) {
            (Outcome::Resolved, Timing::Sync) => self.resolve_sync_alt(ctor, None),
            (Outcome::Resolved, Timing::Async) => self.resolve_async_alt(ctor, None),
            (Outcome::Rejected, Timing::Sync) => self.reject_sync_alt(ctor, error),
            (Outcome::Rejected, Timing::Async) => self.reject_async_alt(ctor, error),
        }
    }

    /// A factory for [`Fixtures::resolve_sync_alt`] promises.
    pub fn resolve_sync_method_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        value: Option<Value>,
    ) -> PromiseMethod {
        let fixtures = self.clone();
        let ctor = ctor.clone();
        Rc::new(move || fixtures.resolve_sync_alt(&ctor, value.clone()))
    }

    /// A factory for [`Fixtures::resolve_async_alt`] promises.
    pub fn resolve_async_method_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        value: Option<Value>,
    ) -> PromiseMethod {
        let fixtures = self.clone();
        let ctor = ctor.clone();
        Rc::new(move || fixtures.resolve_async_alt(&ctor, value.clone()))
    }

    /// A factory for [`Fixtures::reject_sync_alt`] promises. Every call
    /// rejects with the same error.
    pub fn reject_sync_method_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        error: Option<JsError>,
    ) -> PromiseMethod {
        let fixtures = self.clone();
        let ctor = ctor.clone();
        Rc::new(move || fixtures.reject_sync_alt(&ctor, error.clone()))
    }

    /// A factory for [`Fixtures::reject_async_alt`] promises.
    pub fn reject_async_method_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        error: Option<JsError>,
    ) -> PromiseMethod {
        let fixtures = self.clone();
        let ctor = ctor.clone();
        Rc::new(move || fixtures.reject_async_alt(&ctor, error.clone()))
    }

    /// Like [`Fixtures::reject_sync_method_alt`], but the error is supplied
    /// per call.
    pub fn reject_sync_method_error_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
    ) -> ErrorPromiseMethod {
        let fixtures = self.clone();
        let ctor = ctor.clone();
        Rc::new(move |error| fixtures.reject_sync_alt(&ctor, error))
    }

    /// Like [`Fixtures::reject_async_method_alt`], but the error is
    /// supplied per call.
    pub fn reject_async_method_error_alt(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
    ) -> ErrorPromiseMethod {
        let fixtures = self.clone();
        let ctor = ctor.clone();
        Rc::new(move |error| fixtures.reject_async_alt(&ctor, error))
    }

    /// [`Fixtures::resolve_sync_method_alt`] on the primary constructor.
    pub fn resolve_sync_method(&self, value: Option<Value>) -> PromiseMethod {
        self.resolve_sync_method_alt(&self.primary, value)
    }

    /// [`Fixtures::resolve_async_method_alt`] on the primary constructor.
    pub fn resolve_async_method(&self, value: Option<Value>) -> PromiseMethod {
        self.resolve_async_method_alt(&self.primary, value)
    }

    /// [`Fixtures::reject_sync_method_alt`] on the primary constructor.
    pub fn reject_sync_method(&self, error: Option<JsError>) -> PromiseMethod {
        self.reject_sync_method_alt(&self.primary, error)
    }

    /// [`Fixtures::reject_async_method_alt`] on the primary constructor.
    pub fn reject_async_method(&self, error: Option<JsError>) -> PromiseMethod {
        self.reject_async_method_alt(&self.primary, error)
    }

    /// [`Fixtures::reject_sync_method_error_alt`] on the primary
    /// constructor.
    pub fn reject_sync_method_error(&self) -> ErrorPromiseMethod {
        self.reject_sync_method_error_alt(&self.primary)
    }

    /// [`Fixtures::reject_async_method_error_alt`] on the primary
    /// constructor.
    pub fn reject_async_method_error(&self) -> ErrorPromiseMethod {
        self.reject_async_method_error_alt(&self.primary)
    }

    /// A handler that returns a fresh fixture promise each time it is
    /// called.
    pub fn promise_method(
        &self,
        ctor: &Rc<dyn PromiseConstructor>,
        spec: FixtureSpec,
        error: Option<JsError>,
    ) -> Callback {
        let fixtures = self.clone();
        let ctor = ctor.clone();
        Function::named(format!("returns {} promise", spec), move |_| {
            Ok(fixtures.build(&ctor, spec.outcome, spec.timing, error.clone()))
        })
    }
}

/// A handler returning `value` (default: [`make_value`]).
pub fn literal_method(value: Option<Value>) -> Callback {
    let value = value.unwrap_or_else(make_value);
    Function::named("returns literal", move |_| Ok(value.clone()))
}

/// A handler throwing `error` (default: [`make_error`]).
pub fn throw_method(error: Option<JsError>) -> Callback {
    let error = error.unwrap_or_else(make_error);
    Function::named("throws", move |_| Err(error.clone()))
}
