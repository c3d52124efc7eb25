//! Reference async runtime for the promise conformance harness.
//!
//! This crate provides the collaborators the harness exercises when it
//! checks itself:
//! - Event loop with task and microtask queues and unhandled-rejection tracking
//! - Promise implementation following the Promise/A+ specification
//! - Continuation context namespace with a binding side-table
//!
//! # Overview
//!
//! - [`EventLoop`] - Scheduler and driver (one task per turn)
//! - [`PromiseClass`] / [`JsPromise`] - Promise constructor and instances
//! - [`ContextNamespace`] - Active context and function binding
//!
//! # Examples
//!
//! ## Event Loop Usage
//!
//! ```
//! use async_runtime::{EventLoop, Task};
//! use core_types::Value;
//!
//! let event_loop = EventLoop::new();
//! event_loop.enqueue_task(Task::new(|| Ok(Value::Undefined)));
//! event_loop.run_until_done().unwrap();
//! ```
//!
//! ## Patched Promise Usage
//!
//! ```
//! use async_runtime::{ContextNamespace, EventLoop, PromiseClass};
//! use core_types::{ContextProvider, Function, PromiseConstructor, Value};
//!
//! let event_loop = EventLoop::new();
//! let ns = ContextNamespace::new("app");
//! let patched = PromiseClass::patched("patched", event_loop.clone(), ns.clone());
//!
//! let promise = patched.resolve(Value::Smi(123));
//! let handler = Function::new(|args| Ok(args[0].clone()));
//! let ctx = ns.create_context();
//! ns.run(ctx, || promise.as_promise().unwrap().then(Some(handler.clone()), None));
//!
//! assert_eq!(ns.bindings_of(handler.id()).len(), 1);
//! event_loop.run_until_done().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod event_loop;
pub mod promise;
pub mod task_queue;

// Re-export main types at crate root
pub use context::ContextNamespace;
pub use event_loop::EventLoop;
pub use promise::{JsPromise, PromiseClass, PromiseReaction, PromiseState};
pub use task_queue::{JobQueue, MicroTask, MicrotaskQueue, Task, TaskQueue};
