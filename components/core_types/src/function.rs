//! Callable functions with a stable identity.
//!
//! Handlers passed to promise methods are [`Callback`]s. Every function
//! carries a [`FunctionId`] so binding records can be kept in a side-table
//! keyed by identity instead of as state on the callable itself.

use crate::{JsError, Value};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FUNCTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u64);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}

type Body = Box<dyn Fn(Vec<Value>) -> Result<Value, JsError>>;

/// A function that can be called with arguments and returns a Result.
///
/// `Err` means the function threw.
pub struct Function {
    id: FunctionId,
    name: String,
    body: Body,
}

/// Shared handle to a [`Function`].
pub type Callback = Rc<Function>;

impl Function {
    /// Creates a new anonymous Function from a closure.
    pub fn new<F>(f: F) -> Callback
    where
        F: Fn(Vec<Value>) -> Result<Value, JsError> + 'static,
    {
        Self::named("anonymous", f)
    }

    /// Creates a new named Function from a closure.
    pub fn named<F>(name: impl Into<String>, f: F) -> Callback
    where
        F: Fn(Vec<Value>) -> Result<Value, JsError> + 'static,
    {
        Rc::new(Self {
            id: FunctionId(NEXT_FUNCTION_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            body: Box::new(f),
        })
    }

    /// Returns the identity of this function.
    pub fn id(&self) -> FunctionId {
        self.id
    }

    /// Returns the debug name of this function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the function with the given arguments.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, JsError> {
        (self.body)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function {{ {} {} }}", self.name, self.id)
    }
}
