//! Task and microtask queues.
//!
//! A [`Task`] is one scheduler turn: deferred fixture settlements and
//! deferred scenario steps. A [`MicroTask`] is a promise reaction or a
//! thenable adoption job. Both queues are FIFO.

use core_types::{JsError, Value};
use std::collections::VecDeque;
use std::fmt;

type Job = Box<dyn FnOnce() -> Result<Value, JsError>>;

/// One scheduler turn.
pub struct Task(Job);

impl Task {
    /// Wraps `f` as a task.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<Value, JsError> + 'static,
    {
        Task(Box::new(f))
    }

    /// Runs the task, consuming it.
    pub fn run(self) -> Result<Value, JsError> {
        (self.0)()
    }
}

/// One reaction or adoption job.
pub struct MicroTask(Job);

impl MicroTask {
    /// Wraps `f` as a microtask.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<Value, JsError> + 'static,
    {
        MicroTask(Box::new(f))
    }

    /// Runs the microtask, consuming it.
    pub fn run(self) -> Result<Value, JsError> {
        (self.0)()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Task")
    }
}

impl fmt::Debug for MicroTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MicroTask")
    }
}

/// FIFO of pending jobs.
#[derive(Debug)]
pub struct JobQueue<J> {
    jobs: VecDeque<J>,
}

/// Queue of scheduler turns, run one per loop iteration.
pub type TaskQueue = JobQueue<Task>;

/// Queue of microtasks, drained completely before the next task.
pub type MicrotaskQueue = JobQueue<MicroTask>;

impl<J> JobQueue<J> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            jobs: VecDeque::new(),
        }
    }

    /// Appends a job.
    pub fn enqueue(&mut self, job: J) {
        self.jobs.push_back(job);
    }

    /// Removes the oldest job.
    pub fn dequeue(&mut self) -> Option<J> {
        self.jobs.pop_front()
    }

    /// Returns true if no job is queued.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

impl<J> Default for JobQueue<J> {
    fn default() -> Self {
        Self::new()
    }
}
