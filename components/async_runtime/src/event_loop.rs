//! Event loop implementation.
//!
//! This module provides the cooperative event loop that coordinates task
//! and microtask execution. A task is one scheduler turn; all microtasks
//! drain before the next task starts.

use crate::promise::JsPromise;
use crate::task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue};
use core_types::{EventLoopDriver, JsError, Scheduler, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// The event loop.
///
/// Each iteration (turn) of the loop:
/// 1. Drains all microtasks in the microtask queue
/// 2. Reports rejected promises that still have no handler
/// 3. Takes the oldest task from the task queue and executes it
/// 4. Repeats
///
/// Queues use interior mutability so promises and tasks holding an
/// `Rc<EventLoop>` can enqueue work while the loop is running.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Task};
/// use core_types::Value;
///
/// let event_loop = EventLoop::new();
/// event_loop.enqueue_task(Task::new(|| Ok(Value::Undefined)));
/// event_loop.run_until_done().unwrap();
/// assert!(event_loop.is_task_queue_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventLoop {
    task_queue: RefCell<TaskQueue>,
    microtask_queue: RefCell<MicrotaskQueue>,
    pending_rejections: RefCell<Vec<Rc<JsPromise>>>,
    unhandled_rejections: RefCell<Vec<JsError>>,
}

impl EventLoop {
    /// Creates a new shared EventLoop with empty queues.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Runs the event loop until all tasks and microtasks are processed.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all tasks completed successfully, or an error if any task failed.
    pub fn run_until_done(&self) -> Result<(), JsError> {
        loop {
            self.run_all_microtasks()?;
            self.flush_unhandled_rejections();

            let next = self.task_queue.borrow_mut().dequeue();
            match next {
                Some(task) => {
                    task.run()?;
                }
                None => {
                    if self.microtask_queue.borrow().is_empty() {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Adds a task to the task queue.
    pub fn enqueue_task(&self, task: Task) {
        self.task_queue.borrow_mut().enqueue(task);
    }

    /// Adds a microtask to the microtask queue.
    pub fn enqueue_microtask(&self, microtask: MicroTask) {
        self.microtask_queue.borrow_mut().enqueue(microtask);
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.task_queue.borrow().is_empty()
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.microtask_queue.borrow().is_empty()
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// New microtasks added during execution are also processed before
    /// this method returns.
    pub fn run_all_microtasks(&self) -> Result<(), JsError> {
        loop {
            let next = self.microtask_queue.borrow_mut().dequeue();
            match next {
                Some(microtask) => {
                    microtask.run()?;
                }
                None => return Ok(()),
            }
        }
    }

    /// Processes one complete cycle: one task followed by all microtasks.
    pub fn process_one_cycle(&self) -> Result<(), JsError> {
        let next = self.task_queue.borrow_mut().dequeue();
        if let Some(task) = next {
            task.run()?;
        }
        self.run_all_microtasks()?;
        self.flush_unhandled_rejections();
        Ok(())
    }

    /// Remembers a promise that was rejected while nothing observed it.
    pub(crate) fn track_rejection(&self, promise: Rc<JsPromise>) {
        self.pending_rejections.borrow_mut().push(promise);
    }

    /// Reports rejections still unobserved at the end of a turn.
    ///
    /// Promises with tracking disabled stay pending until they are handled
    /// or tracking is switched back on.
    fn flush_unhandled_rejections(&self) {
        let pending = std::mem::take(&mut *self.pending_rejections.borrow_mut());
        let mut keep = Vec::new();
        for promise in pending {
            if promise.is_handled() {
                continue;
            }
            if !promise.is_tracking_rejections() {
                keep.push(promise);
                continue;
            }
            if let Some(reason) = promise.rejection_reason() {
                tracing::debug!(error = %reason, "unhandled rejection");
                self.unhandled_rejections.borrow_mut().push(reason);
            }
        }
        self.pending_rejections.borrow_mut().extend(keep);
    }
}

impl Scheduler for EventLoop {
    fn defer_one_turn(&self, f: Box<dyn FnOnce()>) {
        self.enqueue_task(Task::new(move || {
            f();
            Ok(Value::Undefined)
        }));
    }
}

impl EventLoopDriver for EventLoop {
    fn run_until_idle(&self) -> Result<(), JsError> {
        self.run_until_done()
    }

    fn take_unhandled_rejections(&self) -> Vec<JsError> {
        std::mem::take(&mut *self.unhandled_rejections.borrow_mut())
    }
}
