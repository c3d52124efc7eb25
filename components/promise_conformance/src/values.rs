//! Canonical fixture values and errors.

use core_types::{JsError, Value};

/// Message carried by every fixture error.
pub const REJECTION_MESSAGE: &str = "<rejection value>";

/// The literal every fixture resolves to unless told otherwise.
pub fn make_value() -> Value {
    Value::Smi(123)
}

/// A fresh error. Each call yields a distinct identity so a failing
/// assertion can be traced back to the fixture that produced it.
pub fn make_error() -> JsError {
    JsError::new(REJECTION_MESSAGE)
}
