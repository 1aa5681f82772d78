//! Retry decorator with a fixed attempt bound.
//!
//! The bound counts *total* invocations: `Attempts::new(3)` allows at most
//! three calls of the wrapped stage, either two failures and a final success
//! or three failures, after which the last failure's cause propagates
//! unchanged.

use crate::core::{IntoPipe, Pipe};
use crate::errors::InvalidBound;
use crate::stages::Stage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use tracing::warn;

/// Immutable retry policy: the total number of invocations allowed.
///
/// A zero bound is rejected at construction. The policy carries no interior
/// state and is safely reusable across concurrent executions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attempts(NonZeroU32);

impl Attempts {
    /// Creates a policy allowing `total` invocations in all.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBound`] if `total` is zero.
    pub fn new(total: u32) -> Result<Self, InvalidBound> {
        NonZeroU32::new(total)
            .map(Self)
            .ok_or(InvalidBound { got: total })
    }

    /// The total number of invocations allowed.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Attempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} attempts", self.0)
    }
}

/// Stage decorator that re-attempts failures up to the bound.
///
/// Each invocation starts a fresh attempt counter; there is no cross-call
/// state (this is not a circuit breaker). An `Empty` outcome is not a
/// failure and returns immediately without consuming attempts.
pub struct Retry<S> {
    inner: S,
    up_to: Attempts,
}

impl<S> Retry<S> {
    /// Wraps a stage with a retry bound.
    pub fn new(inner: S, up_to: Attempts) -> Self {
        Self { inner, up_to }
    }
}

#[async_trait]
impl<T, R, S> Stage<T, R> for Retry<S>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    S: Stage<T, R>,
{
    async fn apply(&self, input: T) -> Pipe<R> {
        let total = self.up_to.total();
        let mut attempt = 1;
        loop {
            match self.inner.apply(input.clone()).await {
                Pipe::Failed(cause) => {
                    if attempt >= total {
                        return Pipe::Failed(cause);
                    }
                    warn!(attempt, total, error = %cause, "stage failed, retrying");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

/// Closure-level retry combinator for the synchronous algebra.
///
/// Same semantics as [`Retry`]; the decorated closure plugs directly into
/// [`Pipe::then`] since it returns a ready-made carrier.
pub fn retrying<T, R, O, F>(stage: F, up_to: Attempts) -> impl Fn(T) -> Pipe<R>
where
    T: Clone,
    F: Fn(T) -> O,
    O: IntoPipe<R>,
{
    move |input: T| {
        let total = up_to.total();
        let mut attempt = 1;
        loop {
            match stage(input.clone()).into_pipe() {
                Pipe::Failed(cause) => {
                    if attempt >= total {
                        return Pipe::Failed(cause);
                    }
                    warn!(attempt, total, error = %cause, "stage failed, retrying");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{from_fn, StageExt};
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_attempts_rejects_zero() {
        assert_eq!(Attempts::new(0), Err(InvalidBound { got: 0 }));
    }

    #[test]
    fn test_attempts_total() {
        let up_to = Attempts::new(3).expect("positive bound");
        assert_eq!(up_to.total(), 3);
        assert_eq!(up_to.to_string(), "3 attempts");
    }

    #[test]
    fn test_attempts_serde_round_trip() {
        let up_to = Attempts::new(5).expect("positive bound");
        let json = serde_json::to_string(&up_to).expect("serialize");
        assert_eq!(json, "5");
        let back: Attempts = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, up_to);
    }

    fn flaky(fail_first: u32) -> (impl Fn(i32) -> anyhow::Result<i32>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let stage = move |x: i32| {
            let call = seen.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= fail_first {
                Err(anyhow!("attempt {call} failed"))
            } else {
                Ok(x * 2)
            }
        };
        (stage, calls)
    }

    #[test]
    fn test_retrying_succeeds_on_final_attempt() {
        let (stage, calls) = flaky(2);
        let decorated = retrying(stage, Attempts::new(3).expect("positive bound"));

        let pipe = decorated(10);
        assert_eq!(pipe.into_value(), Some(20));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retrying_exhausted_keeps_last_cause() {
        let (stage, calls) = flaky(10);
        let decorated = retrying(stage, Attempts::new(3).expect("positive bound"));

        let pipe = decorated(10);
        assert_eq!(
            pipe.cause().map(ToString::to_string),
            Some("attempt 3 failed".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retrying_stops_after_first_success() {
        let (stage, calls) = flaky(0);
        let decorated = retrying(stage, Attempts::new(5).expect("positive bound"));

        let pipe = decorated(1);
        assert!(pipe.is_value());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retrying_does_not_retry_empty() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let decorated = retrying(
            move |_: i32| {
                seen.fetch_add(1, Ordering::SeqCst);
                None::<i32>
            },
            Attempts::new(4).expect("positive bound"),
        );

        assert!(decorated(1).is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retrying_fresh_counter_per_invocation() {
        let (stage, calls) = flaky(1);
        let decorated = retrying(stage, Attempts::new(2).expect("positive bound"));

        assert!(decorated(1).is_value());
        assert!(decorated(1).is_value());
        // First call: one failure plus one success; second call: success only.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_stage_decorator() {
        let (stage, calls) = flaky(2);
        let decorated = from_fn(stage).retrying(Attempts::new(3).expect("positive bound"));

        let pipe = decorated.apply(10).await;
        assert_eq!(pipe.into_value(), Some(20));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_stage_decorator_exhausted() {
        let (stage, calls) = flaky(10);
        let decorated = Retry::new(from_fn(stage), Attempts::new(2).expect("positive bound"));

        let pipe = decorated.apply(10).await;
        assert!(pipe.is_failed());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
