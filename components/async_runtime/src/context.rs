//! Continuation context namespace.
//!
//! A [`ContextNamespace`] tracks which context is active and binds
//! functions to contexts. Binding records are kept in a side-table keyed
//! by the original function's identity plus a global log.

use core_types::{BindingRecord, Callback, ContextId, ContextProvider, Function, FunctionId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct NamespaceState {
    active: Cell<Option<ContextId>>,
    saved: RefCell<Vec<Option<ContextId>>>,
    next_context: Cell<u64>,
    bindings: RefCell<HashMap<FunctionId, Vec<BindingRecord>>>,
    log: RefCell<Vec<BindingRecord>>,
}

/// Context namespace with explicit enter/exit discipline.
///
/// Cloning yields another handle to the same namespace.
///
/// # Examples
///
/// ```
/// use async_runtime::ContextNamespace;
/// use core_types::ContextProvider;
///
/// let ns = ContextNamespace::new("test");
/// let ctx = ns.create_context();
/// assert_eq!(ns.active_context(), None);
/// ns.run(ctx, || assert_eq!(ns.active_context(), Some(ctx)));
/// assert_eq!(ns.active_context(), None);
/// ```
#[derive(Debug, Clone)]
pub struct ContextNamespace {
    name: Rc<str>,
    state: Rc<NamespaceState>,
}

impl ContextNamespace {
    /// Creates an empty namespace with no active context.
    pub fn new(name: &str) -> Self {
        Self {
            name: Rc::from(name),
            state: Rc::new(NamespaceState::default()),
        }
    }

    /// Namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allocates a new context.
    pub fn create_context(&self) -> ContextId {
        let next = self.state.next_context.get() + 1;
        self.state.next_context.set(next);
        ContextId(next)
    }

    /// Makes `context` active, saving the previous one.
    pub fn enter(&self, context: ContextId) {
        self.state.saved.borrow_mut().push(self.state.active.get());
        self.state.active.set(Some(context));
    }

    /// Restores the context that was active before the matching `enter`.
    pub fn exit(&self) {
        let previous = self.state.saved.borrow_mut().pop().flatten();
        self.state.active.set(previous);
    }

    /// Runs `f` with `context` active.
    pub fn run<R>(&self, context: ContextId, f: impl FnOnce() -> R) -> R {
        self.enter(context);
        let result = f();
        self.exit();
        result
    }

    /// Binds `f` to the active context, or returns it unchanged when no
    /// context is active.
    pub fn bind_active(&self, f: &Callback) -> Callback {
        match self.state.active.get() {
            Some(context) => self.bind(f, context),
            None => f.clone(),
        }
    }

    /// Clears all binding records.
    pub fn reset_bindings(&self) {
        self.state.bindings.borrow_mut().clear();
        self.state.log.borrow_mut().clear();
    }
}

impl ContextProvider for ContextNamespace {
    fn active_context(&self) -> Option<ContextId> {
        self.state.active.get()
    }

    fn bind(&self, f: &Callback, context: ContextId) -> Callback {
        let record = BindingRecord {
            context,
            function: f.id(),
        };
        self.state
            .bindings
            .borrow_mut()
            .entry(f.id())
            .or_default()
            .push(record);
        self.state.log.borrow_mut().push(record);
        tracing::trace!(namespace = %self.name, function = %f.id(), %context, "bound");

        let ns = self.clone();
        let inner = f.clone();
        Function::named(format!("bound {}", f.name()), move |args| {
            ns.run(context, || inner.call(args))
        })
    }

    fn bindings_of(&self, function: FunctionId) -> Vec<BindingRecord> {
        self.state
            .bindings
            .borrow()
            .get(&function)
            .cloned()
            .unwrap_or_default()
    }

    fn binding_log(&self) -> Vec<BindingRecord> {
        self.state.log.borrow().clone()
    }
}
