//! Capability traits consumed by the conformance harness.
//!
//! The harness never depends on a concrete promise library, scheduler or
//! context mechanism. It talks to them through these traits, and any
//! implementation under test plugs in by implementing them.

use crate::{Callback, FunctionId, JsError, Value};
use std::fmt;
use std::rc::Rc;

/// Nominal identity of a promise constructor (the `instanceof` target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstructorId(pub u64);

impl fmt::Display for ConstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctor#{}", self.0)
    }
}

/// Identity of a continuation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"id\":{}}}", self.0)
    }
}

/// Settles a promise with a value.
pub type Resolve = Rc<dyn Fn(Value)>;

/// Settles a promise with a rejection.
pub type Reject = Rc<dyn Fn(JsError)>;

/// The body passed to a promise constructor.
pub type Executor = Box<dyn FnOnce(Resolve, Reject)>;

/// Shared handle to a promise instance.
pub type PromiseRef = Rc<dyn Thenable>;

/// A promise instance.
pub trait Thenable {
    /// The constructor this instance was produced by.
    fn constructor_id(&self) -> ConstructorId;

    /// Attaches continuation handlers and returns the derived promise.
    ///
    /// Implementations normally return `Value::Promise`, but the harness
    /// checks that rather than assuming it.
    fn then(&self, on_fulfilled: Option<Callback>, on_rejected: Option<Callback>) -> Value;

    /// Enables or disables unhandled-rejection reporting for this instance.
    fn set_rejection_tracking(&self, enabled: bool);
}

/// A promise constructor (`new P(executor)`).
pub trait PromiseConstructor {
    /// Nominal identity shared by every instance this constructor produces.
    fn id(&self) -> ConstructorId;

    /// Display name.
    fn name(&self) -> &str;

    /// Builds a new instance, running `executor` synchronously.
    fn construct(&self, executor: Executor) -> Value;
}

/// Defers work to a later turn of execution.
pub trait Scheduler {
    /// Schedules `f` after the current synchronous execution and its
    /// microtasks, before any later-scheduled turn.
    fn defer_one_turn(&self, f: Box<dyn FnOnce()>);
}

/// One act of binding a function to a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingRecord {
    /// The context the function was bound to
    pub context: ContextId,
    /// The original (unwrapped) function
    pub function: FunctionId,
}

/// The continuation-context mechanism.
pub trait ContextProvider {
    /// The currently active context, `None` when no context is active.
    fn active_context(&self) -> Option<ContextId>;

    /// Wraps `f` so that calling the wrapper restores `context` for the
    /// duration of the call. Appends one [`BindingRecord`] for `f` to the
    /// per-function side-table and to the global log.
    fn bind(&self, f: &Callback, context: ContextId) -> Callback;

    /// Binding records for one function, in binding order.
    fn bindings_of(&self, function: FunctionId) -> Vec<BindingRecord>;

    /// Every binding record, in binding order.
    fn binding_log(&self) -> Vec<BindingRecord>;
}

/// Drives an event loop from outside, between test cases.
pub trait EventLoopDriver {
    /// Runs tasks and microtasks until both queues are empty.
    fn run_until_idle(&self) -> Result<(), JsError>;

    /// Drains rejections that were reported as unhandled.
    fn take_unhandled_rejections(&self) -> Vec<JsError>;
}
