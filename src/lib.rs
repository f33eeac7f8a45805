//! A single-value deferred result, in the spirit of a promise.
//!
//! An [`Operation`] starts out pending and is resolved exactly once, either
//! with a value ([`Operation::resolve`]) or with an error
//! ([`Operation::reject`]). Interested parties register handlers, which run
//! once, in registration order, even if they are registered after the
//! operation has been resolved.
//!
//! Registering a handler returns a new operation (a proxy) that settles with
//! whatever the handler produced. A handler can return a plain value, an
//! error, or another in-flight [`Operation`], in which case the proxy waits
//! for it. This is what allows sequential chains and fan-out of independent
//! requests.
//!
//! ```
//! use operation_out::{Operation, Outcome};
//!
//! let city = Operation::<String, String>::new();
//! let weather = city.on_success(|city| Outcome::Value(format!("50 in {city}")));
//!
//! city.resolve("New York, NY".into()).unwrap();
//! assert_eq!(weather.value(), Some("50 in New York, NY".to_string()));
//! ```
use thiserror::Error;

pub mod executor;
pub mod operation;
pub mod outcome;
pub mod producer;
pub mod sample;
pub mod waiter;

pub use executor::{do_later, inline::InlineExecutor, queue::TaskQueue, Executor, Task};
pub use operation::{Operation, Status};
pub use outcome::Outcome;
pub use producer::Completion;
pub use waiter::Waiter;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("operation has already been resolved")]
    AlreadyResolved,
    #[error("operation was dropped before it was resolved")]
    Abandoned,
}
