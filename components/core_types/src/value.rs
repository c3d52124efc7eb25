//! Value representation.
//!
//! This module provides the `Value` enum carried through promise
//! settlement: primitives, errors, functions and promises.

use crate::{Callback, JsError, PromiseRef};
use std::fmt;
use std::rc::Rc;

/// Represents any value a promise can settle to or a handler can return.
///
/// Primitive values are stored inline; functions and promises are shared
/// handles compared by identity.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// assert_eq!(Value::Smi(123), Value::Double(123.0));
/// assert_eq!(Value::Smi(123).to_string(), "123");
/// assert!(Value::Undefined.as_promise().is_none());
/// ```
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean (true or false)
    Boolean(bool),
    /// Small integer
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// String value
    String(String),
    /// Error object
    Error(JsError),
    /// Callable function
    Function(Callback),
    /// A promise-like object exposing `then`
    Promise(PromiseRef),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Value::Function(func) => f.debug_tuple("Function").field(&func.id()).finish(),
            Value::Promise(p) => f.debug_tuple("Promise").field(&p.constructor_id()).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Error(e) => write!(f, "{}", e),
            Value::Function(func) => write!(f, "[Function {}]", func.name()),
            Value::Promise(p) => write!(f, "[Promise {}]", p.constructor_id()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Smi(a), Value::Double(b)) | (Value::Double(b), Value::Smi(a)) => {
                f64::from(*a) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Promise(a), Value::Promise(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Returns the promise handle if this value is a promise.
    pub fn as_promise(&self) -> Option<&PromiseRef> {
        match self {
            Value::Promise(p) => Some(p),
            _ => None,
        }
    }
}
