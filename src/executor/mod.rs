//! Deferred dispatch for producers.
//!
//! A producer does not complete on the caller's stack: it hands its work to
//! an [`Executor`], which decides when that work runs. [`InlineExecutor`]
//! runs it right away, which is handy when ordering does not matter.
//! [`TaskQueue`] holds it until somebody drains the queue, which gives tests
//! a synchronous stand-in for "run this after the current call stack
//! unwinds" without any wall-clock delay.
//!
//! [`InlineExecutor`]: inline::InlineExecutor
//! [`TaskQueue`]: queue::TaskQueue

pub mod inline;
pub mod queue;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send>;

/// Entry point to deferred scheduling.
pub trait Executor {
    /// Schedule a task. Whether it runs before or after this call returns is
    /// up to the implementation.
    fn execute(&self, task: Task);
}

/// Run `f` later on `executor`.
pub fn do_later<X, F>(executor: &X, f: F)
where
    X: Executor + ?Sized,
    F: FnOnce() + Send + 'static,
{
    executor.execute(Box::new(f))
}
