//! Core value types, errors and capability traits shared by the promise
//! conformance workspace.
//!
//! This crate provides the vocabulary every other component speaks:
//! values flowing through promises, errors used as rejection reasons,
//! callable functions with a stable identity, and the capability traits
//! a promise implementation under test must expose.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of values passed through promises
//! - [`JsError`] - Errors with an identity used as rejection reasons
//! - [`Function`] / [`Callback`] - Callables with a stable [`FunctionId`]
//! - [`PromiseConstructor`] / [`Thenable`] - The promise capability
//! - [`Scheduler`] - Defers work to a later turn
//! - [`ContextProvider`] - Continuation context and binding records
//!
//! # Examples
//!
//! ```
//! use core_types::{JsError, Value};
//!
//! let num = Value::Smi(123);
//! assert_eq!(num.to_string(), "123");
//!
//! let a = JsError::new("<rejection value>");
//! let b = JsError::new("<rejection value>");
//! assert_ne!(a, b);
//! assert_eq!(a, a.clone());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod capability;
mod error;
mod function;
mod value;

pub use capability::{
    BindingRecord, ConstructorId, ContextId, ContextProvider, EventLoopDriver, Executor,
    PromiseConstructor, PromiseRef, Reject, Resolve, Scheduler, Thenable,
};
pub use error::{ErrorId, ErrorKind, JsError};
pub use function::{Callback, Function, FunctionId};
pub use value::Value;
