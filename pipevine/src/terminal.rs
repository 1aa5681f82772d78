//! Mandatory exhaustive terminal consumption.
//!
//! Every chain ends by collapsing the carrier into the pipeline's public
//! output type. The [`Terminal`] trait is the only place carrier state is
//! irreversibly unwrapped, and the compiler enforces that an implementation
//! covers all three states.

use crate::core::Pipe;

/// Exhaustive handler for the three carrier states.
///
/// A terminal handler is constructed once by the pipeline owner and may be
/// reused across executions; the chain invokes exactly one of the three
/// operations exactly once per execution. Leaving an operation unimplemented
/// is a compile error, so failure handling cannot be forgotten.
pub trait Terminal<T> {
    /// The pipeline's public output type.
    type Output;

    /// Handles an empty carrier.
    fn on_empty(&self) -> Self::Output;

    /// Handles a value.
    fn on_value(&self, value: T) -> Self::Output;

    /// Handles a failure cause.
    fn on_failure(&self, cause: anyhow::Error) -> Self::Output;
}

/// A function-record terminal handler.
///
/// The three fields form the exhaustive contract as plain closures, for
/// call sites that do not want a named handler type.
#[derive(Debug, Clone)]
pub struct Handlers<E, V, F> {
    /// Invoked for an empty carrier.
    pub on_empty: E,
    /// Invoked with the final value.
    pub on_value: V,
    /// Invoked with the failure cause.
    pub on_failure: F,
}

/// Builds a function-record terminal handler from three closures.
pub fn handlers<E, V, F>(on_empty: E, on_value: V, on_failure: F) -> Handlers<E, V, F> {
    Handlers {
        on_empty,
        on_value,
        on_failure,
    }
}

impl<T, R, E, V, F> Terminal<T> for Handlers<E, V, F>
where
    E: Fn() -> R,
    V: Fn(T) -> R,
    F: Fn(anyhow::Error) -> R,
{
    type Output = R;

    fn on_empty(&self) -> R {
        (self.on_empty)()
    }

    fn on_value(&self, value: T) -> R {
        (self.on_value)(value)
    }

    fn on_failure(&self, cause: anyhow::Error) -> R {
        (self.on_failure)(cause)
    }
}

impl<T> Pipe<T> {
    /// Collapses the carrier through a terminal handler.
    ///
    /// Exactly one of the handler's operations is invoked, chosen by the
    /// active state. This and [`crate::pipeline::Chain::finish`] are the only
    /// points where a carrier is unwrapped.
    pub fn fold<H>(self, handler: &H) -> H::Output
    where
        H: Terminal<T>,
    {
        match self {
            Self::Empty => handler.on_empty(),
            Self::Value(value) => handler.on_value(value),
            Self::Failed(cause) => handler.on_failure(cause),
        }
    }
}
