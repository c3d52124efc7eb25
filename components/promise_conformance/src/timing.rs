//! Timing coordinator.
//!
//! Lets one scenario body run either right away or one scheduler turn
//! later, so "attach before settlement" and "attach after settlement"
//! share the same body.

use core_types::{Scheduler, Value};
use std::rc::Rc;

/// Runs scenario steps now or one turn later on a shared scheduler.
#[derive(Clone)]
pub struct TimingCoordinator {
    scheduler: Rc<dyn Scheduler>,
}

impl TimingCoordinator {
    /// Creates a coordinator deferring through `scheduler`.
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self { scheduler }
    }

    /// Runs `step` now, or after one scheduler turn when `should_defer`.
    ///
    /// A deferred rejecting `related` promise sits unobserved until `step`
    /// attaches to it, so its unhandled-rejection reporting is switched off
    /// for that gap and switched back on once `step` has run.
    pub fn exec_async_if<F>(&self, step: F, should_defer: bool, related: &Value, is_rejecting: bool)
    where
        F: FnOnce() + 'static,
    {
        if !should_defer {
            step();
            return;
        }

        let muted = if is_rejecting {
            related.as_promise().cloned()
        } else {
            None
        };
        if let Some(promise) = &muted {
            promise.set_rejection_tracking(false);
        }

        self.scheduler.defer_one_turn(Box::new(move || {
            step();
            if let Some(promise) = muted {
                promise.set_rejection_tracking(true);
            }
        }));
    }
}
