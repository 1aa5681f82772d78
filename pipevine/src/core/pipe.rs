//! The tri-state carrier propagated through a pipeline chain.

use super::IntoPipe;
use std::future::Future;
use tracing::{debug, trace};

/// The carrier threaded through a pipeline chain.
///
/// A `Pipe` holds exactly one of three states: no value, a value of type `T`,
/// or a failure cause. Chain steps inspect the state with an exhaustive match;
/// `Empty` and `Failed` pass through untouched without invoking the stage,
/// while `Value` feeds the stage inside a failure boundary.
///
/// A `Pipe` is never mutated in place: every chain step consumes the upstream
/// carrier and produces a new one. The failure cause is carried by value and
/// reaches the terminal handler unchanged.
#[derive(Debug)]
pub enum Pipe<T> {
    /// No value was produced. Downstream stages are skipped.
    Empty,
    /// A payload value.
    Value(T),
    /// A failure with its cause. Downstream stages are skipped.
    Failed(anyhow::Error),
}

impl<T> Pipe<T> {
    /// Wraps a value into the carrier.
    #[must_use]
    pub fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// Creates an empty carrier.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Wraps a failure cause into the carrier.
    ///
    /// The cause is preserved as-is: it stays downcastable to its concrete
    /// type all the way to the terminal handler.
    #[must_use]
    pub fn failed(cause: impl Into<anyhow::Error>) -> Self {
        Self::Failed(cause.into())
    }

    /// Returns true if the carrier holds a value.
    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns true if the carrier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true if the carrier holds a failure.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the payload, if the carrier holds one.
    #[must_use]
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    /// Returns the failure cause, if the carrier holds one.
    #[must_use]
    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Failed(cause) => Some(cause),
            Self::Empty | Self::Value(_) => None,
        }
    }

    /// Consumes the carrier, returning the payload if present.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    /// Applies one synchronous chain step.
    ///
    /// `Empty` and `Failed` short-circuit: the stage is not invoked and the
    /// state (including the failure cause) passes through unchanged. A
    /// `Value` is fed to the stage, and the stage's outcome is converted via
    /// [`IntoPipe`]: a present result becomes `Value`, an absent one becomes
    /// `Empty`, and an error becomes `Failed` instead of propagating to the
    /// caller.
    pub fn then<R, O, F>(self, stage: F) -> Pipe<R>
    where
        F: FnOnce(T) -> O,
        O: IntoPipe<R>,
    {
        match self {
            Self::Empty => {
                trace!("upstream is empty, skipping stage");
                Pipe::Empty
            }
            Self::Failed(cause) => {
                trace!("upstream failed, skipping stage");
                Pipe::Failed(cause)
            }
            Self::Value(value) => {
                let next = stage(value).into_pipe();
                if let Pipe::Failed(cause) = &next {
                    debug!(error = %cause, "stage failed, capturing cause");
                }
                next
            }
        }
    }

    /// Applies one asynchronous chain step.
    ///
    /// Identical dispatch to [`Pipe::then`], awaiting the stage future when
    /// the carrier holds a value.
    pub async fn then_async<R, O, Fut, F>(self, stage: F) -> Pipe<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = O>,
        O: IntoPipe<R>,
    {
        match self {
            Self::Empty => {
                trace!("upstream is empty, skipping stage");
                Pipe::Empty
            }
            Self::Failed(cause) => {
                trace!("upstream failed, skipping stage");
                Pipe::Failed(cause)
            }
            Self::Value(value) => {
                let next = stage(value).await.into_pipe();
                if let Pipe::Failed(cause) = &next {
                    debug!(error = %cause, "stage failed, capturing cause");
                }
                next
            }
        }
    }
}

impl<T> From<Option<T>> for Pipe<T> {
    /// `None` maps to `Empty`, the sanctioned way a stage signals
    /// "nothing produced".
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_value_constructor() {
        let pipe = Pipe::value(42);
        assert!(pipe.is_value());
        assert_eq!(pipe.as_value(), Some(&42));
    }

    #[test]
    fn test_empty_constructor() {
        let pipe: Pipe<i32> = Pipe::empty();
        assert!(pipe.is_empty());
        assert_eq!(pipe.as_value(), None);
    }

    #[test]
    fn test_failed_constructor_preserves_cause() {
        let pipe: Pipe<i32> = Pipe::failed(anyhow!("boom"));
        assert!(pipe.is_failed());
        assert_eq!(pipe.cause().map(ToString::to_string), Some("boom".to_string()));
    }

    #[test]
    fn test_from_option() {
        let present: Pipe<i32> = Some(5).into();
        assert!(present.is_value());

        let absent: Pipe<i32> = None.into();
        assert!(absent.is_empty());
    }

    #[test]
    fn test_then_on_value_invokes_stage() {
        let pipe = Pipe::value(5).then(|x: i32| Some(x * 2));
        assert_eq!(pipe.into_value(), Some(10));
    }

    #[test]
    fn test_then_on_empty_skips_stage() {
        let mut invoked = false;
        let pipe: Pipe<i32> = Pipe::<i32>::empty().then(|x| {
            invoked = true;
            Some(x)
        });
        assert!(pipe.is_empty());
        assert!(!invoked);
    }

    #[test]
    fn test_then_on_failed_skips_stage_and_keeps_cause() {
        let mut invoked = false;
        let pipe: Pipe<i32> = Pipe::<i32>::failed(anyhow!("upstream")).then(|x| {
            invoked = true;
            Some(x)
        });
        assert!(!invoked);
        assert_eq!(pipe.cause().map(ToString::to_string), Some("upstream".to_string()));
    }

    #[test]
    fn test_then_converts_stage_error() {
        let pipe: Pipe<i32> = Pipe::value(5).then(|_| Err::<i32, _>(anyhow!("stage blew up")));
        assert!(pipe.is_failed());
        assert_eq!(
            pipe.cause().map(ToString::to_string),
            Some("stage blew up".to_string())
        );
    }

    #[test]
    fn test_then_absent_result_degrades_to_empty() {
        let pipe: Pipe<i32> = Pipe::value(5).then(|_| None::<i32>);
        assert!(pipe.is_empty());
    }

    // The async dispatch needs no runtime services, so tokio_test's
    // lightweight executor is enough here.
    #[test]
    fn test_then_async_on_value() {
        let pipe =
            tokio_test::block_on(Pipe::value(5).then_async(|x: i32| async move { Some(x + 1) }));
        assert_eq!(pipe.into_value(), Some(6));
    }

    #[test]
    fn test_then_async_short_circuits() {
        let pipe: Pipe<i32> =
            tokio_test::block_on(Pipe::<i32>::empty().then_async(|x| async move { Some(x) }));
        assert!(pipe.is_empty());

        let pipe: Pipe<i32> = tokio_test::block_on(
            Pipe::<i32>::failed(anyhow!("e")).then_async(|x| async move { Some(x) }),
        );
        assert!(pipe.is_failed());
    }

    #[test]
    fn test_cause_downcast_survives_propagation() {
        #[derive(Debug, thiserror::Error)]
        #[error("typed failure {0}")]
        struct TypedError(u32);

        let pipe: Pipe<i32> = Pipe::<i32>::failed(TypedError(7))
            .then(|x| Some(x))
            .then(|x| Some(x + 1));

        let cause = pipe.cause().and_then(|c| c.downcast_ref::<TypedError>());
        assert!(matches!(cause, Some(TypedError(7))));
    }
}
