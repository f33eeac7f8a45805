//! A `Waiter` lets async code `.await` an [`Operation`] instead of
//! registering handlers on it.
//!
use crate::{Error, Operation};
use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll, Waker},
};

/// Future returned by [`Operation::wait`].
///
/// Resolves to the operation's outcome, or to [`Error::Abandoned`] when every
/// holder of a pending operation drops it.
///
/// # Examples
///
/// ```
/// use operation_out::Operation;
/// use futures::executor::block_on;
/// use std::thread;
///
/// let op = Operation::<String, String>::new();
/// let waiter = op.wait();
/// let task1 = thread::spawn(move || block_on(waiter));
/// op.resolve("🍓".into()).unwrap();
/// assert_eq!(task1.join().unwrap(), Ok(Ok("🍓".to_string())));
/// ```
#[derive(Debug)]
pub struct Waiter<T, E> {
    slot: Arc<Mutex<Slot<T, E>>>,
}

#[derive(Debug)]
enum WakerState {
    Fresh,
    Tainted,
}

#[derive(Debug)]
struct Slot<T, E> {
    value: Option<Result<T, E>>,
    waker: Result<Waker, WakerState>,
}

fn lock<T, E>(slot: &Mutex<Slot<T, E>>) -> MutexGuard<'_, Slot<T, E>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared by the two handlers registered on the operation. Dropping the last
/// one without a value means the operation can no longer settle.
struct Notifier<T, E> {
    slot: Arc<Mutex<Slot<T, E>>>,
}

impl<T, E> Notifier<T, E> {
    fn fill(&self, value: Result<T, E>) {
        let mut slot = lock(&self.slot);
        slot.value = Some(value);
        if let Ok(waker) = std::mem::replace(&mut slot.waker, Err(WakerState::Tainted)) {
            waker.wake()
        }
    }
}

impl<T, E> Drop for Notifier<T, E> {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        if slot.value.is_some() {
            return;
        }
        if let Ok(waker) = std::mem::replace(&mut slot.waker, Err(WakerState::Tainted)) {
            waker.wake()
        }
    }
}

impl<T, E> Operation<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// A future that completes once this operation settles.
    pub fn wait(&self) -> Waiter<T, E> {
        let slot = Arc::new(Mutex::new(Slot {
            value: None,
            waker: Err(WakerState::Fresh),
        }));
        let notifier = Arc::new(Notifier { slot: slot.clone() });
        let on_failure = notifier.clone();
        self.register(
            Box::new(move |value| notifier.fill(Ok(value))),
            Box::new(move |err| on_failure.fill(Err(err))),
        );
        Waiter { slot }
    }
}

impl<T, E> Future for Waiter<T, E> {
    type Output = Result<Result<T, E>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = lock(&self.slot);
        match slot.value.take() {
            Some(value) => Poll::Ready(Ok(value)),
            None => match std::mem::replace(&mut slot.waker, Ok(cx.waker().clone())) {
                Err(WakerState::Tainted) => Poll::Ready(Err(Error::Abandoned)),
                _ => Poll::Pending,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Operation};
    use futures::executor::block_on;
    use std::thread;

    #[test]
    fn test_wait_resolve() {
        let op = Operation::<String, String>::new();
        let waiter = op.wait();
        let task1 = thread::spawn(move || block_on(waiter));
        let c_op = op.clone();
        let task2 = thread::spawn(move || c_op.resolve(String::from("🍓")));
        assert_eq!(task2.join().expect("The task2 thread has panicked"), Ok(()));
        assert_eq!(
            task1.join().expect("The task1 thread has panicked"),
            Ok(Ok("🍓".to_string()))
        );
    }

    #[test]
    fn test_wait_reject() {
        let op = Operation::<String, String>::new();
        let waiter = op.wait();
        let task1 = thread::spawn(move || block_on(waiter));
        op.reject("reject!!".into()).unwrap();
        assert_eq!(
            task1.join().expect("The task1 thread has panicked"),
            Ok(Err("reject!!".to_string()))
        );
    }

    #[test]
    fn test_wait_after_settled() {
        let op = Operation::<i32, ()>::resolved(8);
        assert_eq!(block_on(op.wait()), Ok(Ok(8)));
    }

    #[test]
    fn test_wait_abandoned() {
        let op = Operation::<String, String>::new();
        let waiter = op.wait();
        let task1 = thread::spawn(move || block_on(waiter));
        let task2 = thread::spawn(move || {
            // Move the only handle here and never resolve it.
            std::mem::drop(op);
        });
        task2.join().expect("The task2 thread has panicked");
        assert_eq!(
            task1.join().expect("The task1 thread has panicked"),
            Err(Error::Abandoned)
        );
    }

    #[test]
    fn test_wait_many() {
        let op = Operation::<u8, ()>::new();
        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let waiter = op.wait();
                thread::spawn(move || block_on(waiter))
            })
            .collect();
        op.resolve(1).unwrap();
        for task in tasks {
            assert_eq!(task.join().expect("The task thread has panicked"), Ok(Ok(1)));
        }
    }
}
