//! Promise implementation following the Promise/A+ specification.
//!
//! This module provides a reference promise with nominal constructor
//! identity. A [`PromiseClass`] built with [`PromiseClass::patched`]
//! binds every handler passed to `then` to the context active at
//! attachment time, which is the behaviour the conformance matrices check.

use crate::context::ContextNamespace;
use crate::event_loop::EventLoop;
use crate::task_queue::MicroTask;
use core_types::{
    Callback, ConstructorId, ErrorKind, Executor, Function, JsError, PromiseConstructor,
    PromiseRef, Reject, Resolve, Thenable, Value,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONSTRUCTOR_ID: AtomicU64 = AtomicU64::new(1);

/// The state of a Promise.
///
/// Once settled (Fulfilled or Rejected), a Promise cannot change state.
#[derive(Debug, Clone, PartialEq)]
pub enum PromiseState {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been fulfilled with a value.
    Fulfilled(Value),
    /// The promise has been rejected with an error.
    Rejected(JsError),
}

/// A reaction to be triggered when a Promise settles.
///
/// This represents the handlers registered via `.then()`.
#[derive(Debug)]
pub struct PromiseReaction {
    /// The promise that will be resolved/rejected based on this reaction
    pub derived: Rc<JsPromise>,
    /// Handler for fulfilled state
    pub on_fulfilled: Option<Callback>,
    /// Handler for rejected state
    pub on_rejected: Option<Callback>,
}

#[derive(Debug)]
struct ClassInner {
    id: ConstructorId,
    name: String,
    event_loop: Rc<EventLoop>,
    namespace: Option<ContextNamespace>,
}

/// A promise constructor.
///
/// Every instance built by one class shares its [`ConstructorId`];
/// two classes never share one, even with the same name.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, PromiseClass};
/// use core_types::{PromiseConstructor, Value};
/// use std::rc::Rc;
///
/// let event_loop = EventLoop::new();
/// let native = PromiseClass::new("native", event_loop.clone());
/// let promise = native.construct(Box::new(|resolve, _reject| resolve(Value::Smi(123))));
/// assert_eq!(promise.as_promise().unwrap().constructor_id(), native.id());
/// ```
#[derive(Debug, Clone)]
pub struct PromiseClass {
    inner: Rc<ClassInner>,
}

impl PromiseClass {
    /// Creates an unpatched constructor.
    pub fn new(name: &str, event_loop: Rc<EventLoop>) -> Self {
        Self::build(name, event_loop, None)
    }

    /// Creates a constructor whose `then` binds handlers to the active
    /// context of `namespace`.
    pub fn patched(name: &str, event_loop: Rc<EventLoop>, namespace: ContextNamespace) -> Self {
        Self::build(name, event_loop, Some(namespace))
    }

    fn build(name: &str, event_loop: Rc<EventLoop>, namespace: Option<ContextNamespace>) -> Self {
        Self {
            inner: Rc::new(ClassInner {
                id: ConstructorId(NEXT_CONSTRUCTOR_ID.fetch_add(1, Ordering::Relaxed)),
                name: name.to_string(),
                event_loop,
                namespace,
            }),
        }
    }

    /// Returns true if `then` binds handlers to contexts.
    pub fn is_patched(&self) -> bool {
        self.inner.namespace.is_some()
    }

    /// The event loop promise reactions run on.
    pub fn event_loop(&self) -> &Rc<EventLoop> {
        &self.inner.event_loop
    }

    /// Creates a pending instance.
    pub fn new_pending(&self) -> Rc<JsPromise> {
        Rc::new(JsPromise {
            class: self.clone(),
            state: RefCell::new(PromiseState::Pending),
            reactions: RefCell::new(Vec::new()),
            handled: Cell::new(false),
            tracking: Cell::new(true),
        })
    }

    /// `Promise.resolve(value)`: returns `value` unchanged when it is
    /// already an instance of this class, otherwise a new instance
    /// following `value`.
    pub fn resolve(&self, value: Value) -> Value {
        if let Value::Promise(p) = &value {
            if p.constructor_id() == self.id() {
                return value;
            }
        }
        let promise = self.new_pending();
        promise.resolve(value);
        into_value(promise)
    }

    /// `Promise.reject(error)`.
    pub fn reject(&self, error: JsError) -> Value {
        let promise = self.new_pending();
        promise.reject(error);
        into_value(promise)
    }

    /// `Promise.try(f)`: calls `f` synchronously and settles with its
    /// outcome; a thrown error becomes a rejection.
    pub fn try_call(&self, f: &Callback) -> Value {
        let promise = self.new_pending();
        match f.call(vec![]) {
            Ok(value) => promise.resolve(value),
            Err(error) => promise.reject(error),
        }
        into_value(promise)
    }
}

impl PromiseConstructor for PromiseClass {
    fn id(&self) -> ConstructorId {
        self.inner.id
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn construct(&self, executor: Executor) -> Value {
        let promise = self.new_pending();
        let (resolve, reject) = promise.resolving_functions();
        executor(resolve, reject);
        into_value(promise)
    }
}

/// A promise instance.
pub struct JsPromise {
    class: PromiseClass,
    state: RefCell<PromiseState>,
    reactions: RefCell<Vec<PromiseReaction>>,
    handled: Cell<bool>,
    tracking: Cell<bool>,
}

impl JsPromise {
    /// Current state.
    pub fn state(&self) -> PromiseState {
        self.state.borrow().clone()
    }

    /// Returns true while the promise is pending.
    pub fn is_pending(&self) -> bool {
        matches!(*self.state.borrow(), PromiseState::Pending)
    }

    /// Checks if there are pending reactions.
    pub fn has_pending_reactions(&self) -> bool {
        !self.reactions.borrow().is_empty()
    }

    /// Resolves the promise, adopting the state of `value` when it is a
    /// promise. Adoption happens in a microtask.
    pub fn resolve(self: &Rc<Self>, value: Value) {
        if !self.is_pending() {
            return;
        }
        let thenable = match &value {
            Value::Promise(thenable) => thenable.clone(),
            _ => {
                self.fulfill(value);
                return;
            }
        };

        if std::ptr::eq(
            Rc::as_ptr(&thenable) as *const (),
            Rc::as_ptr(self) as *const (),
        ) {
            self.reject(JsError::with_kind(
                ErrorKind::TypeError,
                "Chaining cycle detected for promise",
            ));
            return;
        }

        let (resolve, reject) = self.resolving_functions();
        self.class
            .event_loop()
            .enqueue_microtask(MicroTask::new(move || {
                let on_fulfilled = Function::named("adopt fulfilled", move |args| {
                    resolve(first_arg(args));
                    Ok(Value::Undefined)
                });
                let on_rejected = Function::named("adopt rejected", move |args| {
                    reject(into_reason(first_arg(args)));
                    Ok(Value::Undefined)
                });
                thenable.then(Some(on_fulfilled), Some(on_rejected));
                Ok(Value::Undefined)
            }));
    }

    /// Fulfills the promise with a value. No-op once settled.
    pub fn fulfill(self: &Rc<Self>, value: Value) {
        if !self.is_pending() {
            return;
        }
        *self.state.borrow_mut() = PromiseState::Fulfilled(value.clone());
        let reactions = std::mem::take(&mut *self.reactions.borrow_mut());
        for reaction in reactions {
            self.queue_reaction(reaction, Ok(value.clone()));
        }
    }

    /// Rejects the promise with an error. No-op once settled.
    pub fn reject(self: &Rc<Self>, error: JsError) {
        if !self.is_pending() {
            return;
        }
        *self.state.borrow_mut() = PromiseState::Rejected(error.clone());
        let reactions = std::mem::take(&mut *self.reactions.borrow_mut());
        if reactions.is_empty() && !self.handled.get() {
            self.class.event_loop().track_rejection(self.clone());
        }
        for reaction in reactions {
            self.queue_reaction(reaction, Err(error.clone()));
        }
    }

    /// Resolve/reject pair sharing one already-resolved flag.
    fn resolving_functions(self: &Rc<Self>) -> (Resolve, Reject) {
        let already_resolved = Rc::new(Cell::new(false));

        let promise = self.clone();
        let flag = already_resolved.clone();
        let resolve: Resolve = Rc::new(move |value| {
            if !flag.replace(true) {
                promise.resolve(value);
            }
        });

        let promise = self.clone();
        let reject: Reject = Rc::new(move |error| {
            if !already_resolved.replace(true) {
                promise.reject(error);
            }
        });

        (resolve, reject)
    }

    fn queue_reaction(&self, reaction: PromiseReaction, settled: Result<Value, JsError>) {
        self.class
            .event_loop()
            .enqueue_microtask(MicroTask::new(move || {
                let PromiseReaction {
                    derived,
                    on_fulfilled,
                    on_rejected,
                } = reaction;
                let outcome = match settled {
                    Ok(value) => match on_fulfilled {
                        Some(handler) => handler.call(vec![value]),
                        None => Ok(value),
                    },
                    Err(error) => match on_rejected {
                        Some(handler) => handler.call(vec![Value::Error(error)]),
                        None => Err(error),
                    },
                };
                match outcome {
                    Ok(value) => derived.resolve(value),
                    Err(error) => derived.reject(error),
                }
                Ok(Value::Undefined)
            }));
    }

    pub(crate) fn is_handled(&self) -> bool {
        self.handled.get()
    }

    pub(crate) fn is_tracking_rejections(&self) -> bool {
        self.tracking.get()
    }

    pub(crate) fn rejection_reason(&self) -> Option<JsError> {
        match &*self.state.borrow() {
            PromiseState::Rejected(error) => Some(error.clone()),
            _ => None,
        }
    }
}

impl Thenable for JsPromise {
    fn constructor_id(&self) -> ConstructorId {
        self.class.id()
    }

    fn then(&self, on_fulfilled: Option<Callback>, on_rejected: Option<Callback>) -> Value {
        let (on_fulfilled, on_rejected) = match &self.class.inner.namespace {
            Some(ns) => (
                on_fulfilled.map(|f| ns.bind_active(&f)),
                on_rejected.map(|f| ns.bind_active(&f)),
            ),
            None => (on_fulfilled, on_rejected),
        };

        let derived = self.class.new_pending();
        let reaction = PromiseReaction {
            derived: derived.clone(),
            on_fulfilled,
            on_rejected,
        };
        self.handled.set(true);

        let state = self.state();
        match state {
            PromiseState::Pending => self.reactions.borrow_mut().push(reaction),
            PromiseState::Fulfilled(value) => self.queue_reaction(reaction, Ok(value)),
            PromiseState::Rejected(error) => self.queue_reaction(reaction, Err(error)),
        }

        into_value(derived)
    }

    fn set_rejection_tracking(&self, enabled: bool) {
        self.tracking.set(enabled);
    }
}

impl fmt::Debug for JsPromise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsPromise")
            .field("class", &self.class.name())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

fn into_value(promise: Rc<JsPromise>) -> Value {
    let handle: PromiseRef = promise;
    Value::Promise(handle)
}

fn first_arg(args: Vec<Value>) -> Value {
    args.into_iter().next().unwrap_or(Value::Undefined)
}

/// Turns a rejection argument back into an error.
fn into_reason(value: Value) -> JsError {
    match value {
        Value::Error(error) => error,
        other => JsError::new(other.to_string()),
    }
}
