//! Single-threaded FIFO task queue.
//!
//! Tasks pile up until the owner drains the queue, one at a time and in the
//! order they were scheduled. A task may schedule more tasks; they run in the
//! same drain, after everything that was already queued.

use crate::executor::{Executor, Task};
use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::trace;

/// Clonable handle onto a shared queue of deferred tasks.
///
/// # Examples
///
/// ```
/// use operation_out::{do_later, TaskQueue};
/// use std::sync::{Arc, Mutex};
///
/// let queue = TaskQueue::new();
/// let log = Arc::new(Mutex::new(Vec::new()));
///
/// let first = log.clone();
/// do_later(&queue, move || first.lock().unwrap().push(1));
/// let second = log.clone();
/// do_later(&queue, move || second.lock().unwrap().push(2));
///
/// assert!(log.lock().unwrap().is_empty());
/// assert_eq!(queue.run_until_idle(), 2);
/// assert_eq!(*log.lock().unwrap(), vec![1, 2]);
/// ```
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Arc<Mutex<VecDeque<Task>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn tasks(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }

    /// Run the oldest queued task, if any. The queue is unlocked while the
    /// task runs.
    pub fn run_next(&self) -> bool {
        let task = self.tasks().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty, including tasks scheduled along
    /// the way. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        trace!(ran, "task queue idle");
        ran
    }
}

impl Executor for TaskQueue {
    fn execute(&self, task: Task) {
        self.tasks().push_back(task);
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.len())
            .finish()
    }
}
