//! Error values used as rejection reasons and thrown exceptions.
//!
//! Errors compare by identity: two errors built from the same message are
//! still different errors, mirroring reference equality of error objects.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ERROR_ID: AtomicU64 = AtomicU64::new(1);

/// The kind of error.
///
/// These correspond to the built-in error constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Plain `Error`
    Error,
    /// Type error (e.g., calling a non-function)
    TypeError,
    /// Value out of allowed range
    RangeError,
    /// Internal engine error
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// Identity of an error object, unique per construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorId(pub u64);

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An error with a kind, message and identity.
///
/// Cloning keeps the identity, so a clone is "the same error". Building a
/// new error with [`JsError::new`] always yields a distinct identity.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, JsError};
///
/// let error = JsError::with_kind(ErrorKind::TypeError, "undefined is not a function");
/// assert_eq!(error.message, "undefined is not a function");
/// assert_eq!(error.to_string(), format!("TypeError: undefined is not a function ({})", error.id));
/// ```
#[derive(Debug, Clone)]
pub struct JsError {
    /// Identity of this error
    pub id: ErrorId,
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl JsError {
    /// Creates a plain `Error` with a fresh identity.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Error, message)
    }

    /// Creates an error of the given kind with a fresh identity.
    pub fn with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            id: ErrorId(NEXT_ERROR_ID.fetch_add(1, Ordering::Relaxed)),
            kind,
            message: message.into(),
        }
    }

    /// Returns true if `other` is this very error (same identity).
    pub fn is(&self, other: &JsError) -> bool {
        self.id == other.id
    }
}

impl PartialEq for JsError {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for JsError {}

impl fmt::Display for JsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.kind, self.message, self.id)
    }
}

impl std::error::Error for JsError {}
