//! Glue between callback-style producers and [`Operation`].
//!
//! A producer is anything that is handed a one-shot completion and calls it,
//! usually later and from somewhere else, with either a value or an error.
//!
use crate::Operation;
use tracing::warn;

/// The completion callback handed to a producer.
///
/// Consuming `self` makes a second completion impossible. A producer that
/// drops its completion without calling it leaves the operation pending.
#[derive(Debug)]
pub struct Completion<T, E> {
    operation: Operation<T, E>,
}

impl<T, E> Completion<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// An error rejects the operation, anything else resolves it.
    pub fn complete(self, result: Result<T, E>) {
        let settled = match result {
            Ok(value) => self.operation.resolve(value),
            Err(err) => self.operation.reject(err),
        };
        if let Err(err) = settled {
            warn!(%err, "producer completed a settled operation");
        }
    }
}

impl<T, E> Operation<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Start `producer` and return its pending operation immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use operation_out::{do_later, Operation, TaskQueue};
    ///
    /// let queue = TaskQueue::new();
    /// let op = Operation::<u32, String>::from_producer(|completion| {
    ///     do_later(&queue, move || completion.complete(Ok(50)));
    /// });
    /// assert!(op.is_pending());
    ///
    /// queue.run_until_idle();
    /// assert_eq!(op.value(), Some(50));
    /// ```
    pub fn from_producer<P>(producer: P) -> Self
    where
        P: FnOnce(Completion<T, E>),
    {
        let operation = Operation::new();
        producer(Completion {
            operation: operation.clone(),
        });
        operation
    }
}
