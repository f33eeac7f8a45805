use crate::Operation;

/// What a completion handler hands back to the proxy it was registered on.
///
/// `Value` and `Failure` settle the proxy right away. `Deferred` makes the
/// proxy adopt the eventual outcome of another operation.
#[derive(Debug)]
pub enum Outcome<T, E> {
    Value(T),
    Deferred(Operation<T, E>),
    Failure(E),
}

impl<T, E> From<Operation<T, E>> for Outcome<T, E> {
    fn from(operation: Operation<T, E>) -> Self {
        Outcome::Deferred(operation)
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(err) => Outcome::Failure(err),
        }
    }
}
