//! Context assertion helpers.
//!
//! Every check returns `Ok(())` when the condition holds and a
//! [`CheckError`] describing the problem otherwise. Checks never panic;
//! callers forward the error to the case's error sink.

use core_types::{
    ConstructorId, ContextId, ContextProvider, FunctionId, JsError, PromiseConstructor, Value,
};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// An assertion failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error("Did not return promise")]
    NotPromise,

    #[error("Did not return promise from correct constructor")]
    WrongConstructor {
        expected: ConstructorId,
        actual: ConstructorId,
    },

    #[error("Function not bound")]
    NotBound,

    #[error("Function bound wrong number of times ({0})")]
    BindingCount(usize),

    #[error("Function bound to wrong context (expected: {expected}, got: {actual})")]
    WrongContext {
        expected: ContextId,
        actual: ContextId,
    },

    #[error("No binding occured")]
    NoBinding,

    #[error("Wrong number of bindings ({0})")]
    LogCount(usize),

    #[error("Bound to wrong function or context (expected: {expected}, got: {actual})")]
    WrongBinding {
        expected: ContextId,
        actual: ContextId,
        function: FunctionId,
    },

    #[error("Function bound")]
    UnexpectedBinding,

    #[error(
        "Function run in wrong context (expected: {expected}, got: {})",
        render_context(.actual)
    )]
    WrongRunContext {
        expected: ContextId,
        actual: Option<ContextId>,
    },

    #[error("Handler should not be called")]
    UnexpectedHandlerCall,

    #[error("Handler called {0} times, expected once")]
    HandlerCallCount(usize),

    #[error("Value producer threw: {0}")]
    ValueThrew(String),

    #[error("Expected promise to be {expected} but it was {actual}")]
    Settlement { expected: String, actual: String },

    #[error("Expected a promise to await but got {0}")]
    NotAwaitable(String),

    #[error("Unhandled rejection: {0}")]
    UnhandledRejection(String),
}

fn render_context(context: &Option<ContextId>) -> String {
    match context {
        Some(context) => context.to_string(),
        None => "none".to_string(),
    }
}

/// How a produced promise is expected to settle.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// Fulfils; with `Some(v)` the value must equal `v`
    Fulfilled(Option<Value>),
    /// Rejects with exactly this error
    Rejected(JsError),
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Fulfilled(None) => write!(f, "fulfilled"),
            Expectation::Fulfilled(Some(value)) => write!(f, "fulfilled with {}", value),
            Expectation::Rejected(error) => write!(f, "rejected with {}", error),
        }
    }
}

/// How a promise actually settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// Fulfilled with a value
    Fulfilled(Value),
    /// Rejected with an error
    Rejected(JsError),
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Settlement::Fulfilled(value) => write!(f, "fulfilled with {}", value),
            Settlement::Rejected(error) => write!(f, "rejected with {}", error),
        }
    }
}

/// Compares an observed settlement against the expectation.
pub fn check_settlement(expected: &Expectation, actual: &Settlement) -> Result<(), CheckError> {
    let matches = match (expected, actual) {
        (Expectation::Fulfilled(None), Settlement::Fulfilled(_)) => true,
        (Expectation::Fulfilled(Some(want)), Settlement::Fulfilled(got)) => want == got,
        (Expectation::Rejected(want), Settlement::Rejected(got)) => want.is(got),
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(CheckError::Settlement {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Checks bound to one primary constructor and one context provider.
#[derive(Clone)]
pub struct Checks {
    primary: ConstructorId,
    context: Rc<dyn ContextProvider>,
}

impl Checks {
    /// Checks against the nominal identity of `primary`.
    pub fn new(primary: &dyn PromiseConstructor, context: Rc<dyn ContextProvider>) -> Self {
        Self {
            primary: primary.id(),
            context,
        }
    }

    /// Fails unless `value` is a promise produced by the primary
    /// constructor. Being promise-like is not enough.
    pub fn check_is_promise(&self, value: &Value) -> Result<(), CheckError> {
        let promise = value.as_promise().ok_or(CheckError::NotPromise)?;
        let actual = promise.constructor_id();
        if actual != self.primary {
            return Err(CheckError::WrongConstructor {
                expected: self.primary,
                actual,
            });
        }
        Ok(())
    }

    /// Fails unless `function` was bound to `context` exactly `expected`
    /// times, according to both the per-function records and the global
    /// binding log. `None` means once.
    pub fn check_bound(
        &self,
        function: FunctionId,
        context: ContextId,
        expected: Option<usize>,
    ) -> Result<(), CheckError> {
        let expected = expected.filter(|n| *n > 0).unwrap_or(1);

        let bound = self.context.bindings_of(function);
        if bound.is_empty() {
            return Err(CheckError::NotBound);
        }
        if bound.len() != expected {
            return Err(CheckError::BindingCount(bound.len()));
        }
        if let Some(wrong) = bound.iter().find(|record| record.context != context) {
            return Err(CheckError::WrongContext {
                expected: context,
                actual: wrong.context,
            });
        }

        let log = self.context.binding_log();
        if log.is_empty() {
            return Err(CheckError::NoBinding);
        }
        if log.len() != expected {
            return Err(CheckError::LogCount(log.len()));
        }
        if let Some(wrong) = log
            .iter()
            .find(|record| record.context != context || record.function != function)
        {
            return Err(CheckError::WrongBinding {
                expected: context,
                actual: wrong.context,
                function: wrong.function,
            });
        }
        Ok(())
    }

    /// Fails if `function` carries any binding record.
    pub fn check_not_bound(&self, function: FunctionId) -> Result<(), CheckError> {
        if self.context.bindings_of(function).is_empty() {
            Ok(())
        } else {
            Err(CheckError::UnexpectedBinding)
        }
    }

    /// Fails unless `context` is the active context right now.
    pub fn check_run_context(&self, context: ContextId) -> Result<(), CheckError> {
        let active = self.context.active_context();
        if active == Some(context) {
            Ok(())
        } else {
            Err(CheckError::WrongRunContext {
                expected: context,
                actual: active,
            })
        }
    }
}
