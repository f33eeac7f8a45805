//! The deferred result itself. An `Operation` is a clonable handle onto a
//! shared state machine that moves from pending to succeeded or failed
//! exactly once.
//!
use crate::{Error, Outcome};
use std::{
    fmt, mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, trace, warn};

pub(crate) type Callback<A> = Box<dyn FnOnce(A) + Send>;

/// Observable status of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Succeeded,
    Failed,
}

enum State<T, E> {
    Pending {
        on_success: Vec<Callback<T>>,
        on_failure: Vec<Callback<E>>,
    },
    Succeeded(T),
    Failed(E),
}

/// A value of type `T` (or an error of type `E`) that is not available yet.
///
/// Every clone refers to the same underlying operation.
///
/// # Examples
///
/// ```
/// use operation_out::{Operation, Outcome};
/// use std::sync::{Arc, Mutex};
///
/// let op = Operation::<i32, String>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let log = seen.clone();
/// op.on_success(move |value| {
///     log.lock().unwrap().push(value);
///     Outcome::Value(())
/// });
/// op.resolve(7).unwrap();
///
/// // Late registrations still observe the value.
/// let log = seen.clone();
/// op.on_success(move |value| {
///     log.lock().unwrap().push(value * 2);
///     Outcome::Value(())
/// });
/// assert_eq!(*seen.lock().unwrap(), vec![7, 14]);
/// ```
pub struct Operation<T, E> {
    inner: Arc<Mutex<State<T, E>>>,
}

impl<T, E> Clone for Operation<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for Operation<T, E> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(State::Pending {
                on_success: vec![],
                on_failure: vec![],
            })),
        }
    }
}

impl<T, E> Operation<T, E> {
    /// A fresh pending operation with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    // Callbacks never run while this guard is held, so the lock only
    // poisons if one of the short sections below panics.
    fn state(&self) -> MutexGuard<'_, State<T, E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> Status {
        match *self.state() {
            State::Pending { .. } => Status::Pending,
            State::Succeeded(_) => Status::Succeeded,
            State::Failed(_) => Status::Failed,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status() == Status::Pending
    }

    /// True when both handles refer to the same operation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, E> Operation<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn resolved(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State::Succeeded(value))),
        }
    }

    pub fn rejected(err: E) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State::Failed(err))),
        }
    }

    /// The stored value, if the operation has succeeded.
    pub fn value(&self) -> Option<T> {
        match &*self.state() {
            State::Succeeded(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// The stored error, if the operation has failed.
    pub fn error(&self) -> Option<E> {
        match &*self.state() {
            State::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Settle the operation with a value.
    ///
    /// Queued success handlers run once each, in registration order, after
    /// the state has been updated. Queued failure handlers are dropped
    /// without running. Returns [`Error::AlreadyResolved`] and changes
    /// nothing if the operation was already settled.
    pub fn resolve(&self, value: T) -> Result<(), Error> {
        let (on_success, on_failure) = self.settle(State::Succeeded(value.clone()))?;
        drop(on_failure);
        debug!(callbacks = on_success.len(), "operation succeeded");
        for callback in on_success {
            callback(value.clone());
        }
        Ok(())
    }

    /// Settle the operation with an error. The mirror image of
    /// [`Operation::resolve`].
    pub fn reject(&self, err: E) -> Result<(), Error> {
        let (on_success, on_failure) = self.settle(State::Failed(err.clone()))?;
        drop(on_success);
        debug!(callbacks = on_failure.len(), "operation failed");
        for callback in on_failure {
            callback(err.clone());
        }
        Ok(())
    }

    /// Swap in a terminal state and hand back whatever was queued.
    fn settle(
        &self,
        terminal: State<T, E>,
    ) -> Result<(Vec<Callback<T>>, Vec<Callback<E>>), Error> {
        let mut state = self.state();
        let queued = match &mut *state {
            State::Pending {
                on_success,
                on_failure,
            } => (mem::take(on_success), mem::take(on_failure)),
            _ => {
                warn!("attempted to resolve an operation twice");
                return Err(Error::AlreadyResolved);
            }
        };
        *state = terminal;
        Ok(queued)
    }

    /// Queue a pair of callbacks, or run the matching one right away when
    /// the operation is already settled. Exactly one of the two paths is
    /// taken for a given registration.
    pub(crate) fn register(&self, on_success: Callback<T>, on_failure: Callback<E>) {
        let settled = {
            let mut state = self.state();
            match &mut *state {
                State::Pending {
                    on_success: queued_success,
                    on_failure: queued_failure,
                } => {
                    queued_success.push(on_success);
                    queued_failure.push(on_failure);
                    trace!(queued = queued_success.len(), "queued completion handlers");
                    return;
                }
                State::Succeeded(value) => Ok(value.clone()),
                State::Failed(err) => Err(err.clone()),
            }
        };
        match settled {
            Ok(value) => on_success(value),
            Err(err) => on_failure(err),
        }
    }

    /// Core of every chaining call: both branches map the outcome into an
    /// [`Outcome`] for a new proxy operation.
    fn chain<U, S, F>(&self, on_success: S, on_failure: F) -> Operation<U, E>
    where
        U: Clone + Send + 'static,
        S: FnOnce(T) -> Outcome<U, E> + Send + 'static,
        F: FnOnce(E) -> Outcome<U, E> + Send + 'static,
    {
        let proxy = Operation::new();
        let success_proxy = proxy.clone();
        let failure_proxy = proxy.clone();
        self.register(
            Box::new(move |value| settle_proxy(&success_proxy, on_success(value))),
            Box::new(move |err| settle_proxy(&failure_proxy, on_failure(err))),
        );
        proxy
    }

    /// Register optional handlers for both outcomes and return the proxy.
    ///
    /// A missing handler passes the outcome through to the proxy unchanged.
    /// A handler's result settles the proxy: a value resolves it, an error
    /// rejects it, and another operation is forwarded into it once that one
    /// settles. A failure handler that returns a value recovers the chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use operation_out::{Operation, Outcome};
    ///
    /// let op = Operation::<i32, String>::new();
    /// let recovered = op.on_completion(
    ///     None::<fn(i32) -> Outcome<i32, String>>,
    ///     Some(|_err: String| Outcome::Value(-1)),
    /// );
    /// op.reject("boom".into()).unwrap();
    /// assert_eq!(recovered.value(), Some(-1));
    /// ```
    pub fn on_completion<S, F, RS, RF>(
        &self,
        on_success: Option<S>,
        on_failure: Option<F>,
    ) -> Operation<T, E>
    where
        S: FnOnce(T) -> RS + Send + 'static,
        RS: Into<Outcome<T, E>>,
        F: FnOnce(E) -> RF + Send + 'static,
        RF: Into<Outcome<T, E>>,
    {
        self.chain(
            move |value| match on_success {
                Some(handler) => handler(value).into(),
                None => Outcome::Value(value),
            },
            move |err| match on_failure {
                Some(handler) => handler(err).into(),
                None => Outcome::Failure(err),
            },
        )
    }

    /// Run `on_success` with the value; errors pass through to the proxy.
    ///
    /// Unlike [`Operation::on_completion`], the handler may produce a value
    /// of a different type, which is how a chain moves from one step to the
    /// next.
    pub fn on_success<U, S, R>(&self, on_success: S) -> Operation<U, E>
    where
        U: Clone + Send + 'static,
        S: FnOnce(T) -> R + Send + 'static,
        R: Into<Outcome<U, E>>,
    {
        self.chain(move |value| on_success(value).into(), Outcome::Failure)
    }

    /// Run `on_failure` with the error; values pass through to the proxy.
    pub fn on_failure<F, R>(&self, on_failure: F) -> Operation<T, E>
    where
        F: FnOnce(E) -> R + Send + 'static,
        R: Into<Outcome<T, E>>,
    {
        self.chain(Outcome::Value, move |err| on_failure(err).into())
    }

    /// Settle `target` with this operation's outcome once it is known.
    pub fn forward_to(&self, target: &Operation<T, E>) {
        let success_target = target.clone();
        let failure_target = target.clone();
        self.register(
            Box::new(move |value| {
                let _ = success_target.resolve(value);
            }),
            Box::new(move |err| {
                let _ = failure_target.reject(err);
            }),
        );
    }
}

// A proxy is created fresh for one registration and settled only from here,
// so the already-resolved case is logged by resolve/reject and otherwise
// ignored.
fn settle_proxy<T, E>(proxy: &Operation<T, E>, outcome: Outcome<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    match outcome {
        Outcome::Value(value) => {
            let _ = proxy.resolve(value);
        }
        Outcome::Failure(err) => {
            let _ = proxy.reject(err);
        }
        Outcome::Deferred(inner) => inner.forward_to(proxy),
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Operation<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state() {
            State::Pending { on_success, .. } => f
                .debug_struct("Operation::Pending")
                .field("queued", &on_success.len())
                .finish(),
            State::Succeeded(value) => f.debug_tuple("Operation::Succeeded").field(value).finish(),
            State::Failed(err) => f.debug_tuple("Operation::Failed").field(err).finish(),
        }
    }
}
