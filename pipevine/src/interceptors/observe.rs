//! Side-effect injection: observers attached to a stage's value.
//!
//! An observer sees the stage's result and returns it unchanged, which is how
//! logging and auditing attach to a stage without modifying it. The observer
//! runs only when the stage produced a value; `Empty` and `Failed` outcomes
//! pass through unobserved.

use crate::core::{IntoPipe, Pipe};
use crate::stages::Stage;
use async_trait::async_trait;
use tracing::debug;

/// Stage decorator invoking an infallible observer on the value.
pub struct Including<S, Obs> {
    inner: S,
    observer: Obs,
}

impl<S, Obs> Including<S, Obs> {
    /// Attaches an observer to a stage.
    pub fn new(inner: S, observer: Obs) -> Self {
        Self { inner, observer }
    }
}

#[async_trait]
impl<T, R, S, Obs> Stage<T, R> for Including<S, Obs>
where
    T: Send + 'static,
    R: Send + 'static,
    S: Stage<T, R>,
    Obs: Fn(&R) + Send + Sync,
{
    async fn apply(&self, input: T) -> Pipe<R> {
        match self.inner.apply(input).await {
            Pipe::Value(value) => {
                (self.observer)(&value);
                Pipe::Value(value)
            }
            other => other,
        }
    }
}

/// Stage decorator invoking a fallible observer on the value.
///
/// An observer error converts the whole step to `Failed`, carrying the
/// observer's error as the cause. It is not distinguished from a failure of
/// the stage itself; observers that need to be told apart should add their
/// own context to the error.
pub struct TryIncluding<S, Obs> {
    inner: S,
    observer: Obs,
}

impl<S, Obs> TryIncluding<S, Obs> {
    /// Attaches a fallible observer to a stage.
    pub fn new(inner: S, observer: Obs) -> Self {
        Self { inner, observer }
    }
}

#[async_trait]
impl<T, R, S, Obs> Stage<T, R> for TryIncluding<S, Obs>
where
    T: Send + 'static,
    R: Send + 'static,
    S: Stage<T, R>,
    Obs: Fn(&R) -> anyhow::Result<()> + Send + Sync,
{
    async fn apply(&self, input: T) -> Pipe<R> {
        match self.inner.apply(input).await {
            Pipe::Value(value) => match (self.observer)(&value) {
                Ok(()) => Pipe::Value(value),
                Err(cause) => {
                    debug!(error = %cause, "observer failed, failing the step");
                    Pipe::Failed(cause)
                }
            },
            other => other,
        }
    }
}

/// Closure-level observer combinator for the synchronous algebra.
pub fn including<T, R, O, F, Obs>(stage: F, observer: Obs) -> impl Fn(T) -> Pipe<R>
where
    F: Fn(T) -> O,
    O: IntoPipe<R>,
    Obs: Fn(&R),
{
    move |input: T| match stage(input).into_pipe() {
        Pipe::Value(value) => {
            observer(&value);
            Pipe::Value(value)
        }
        other => other,
    }
}

/// Closure-level fallible observer combinator.
pub fn try_including<T, R, O, F, Obs>(stage: F, observer: Obs) -> impl Fn(T) -> Pipe<R>
where
    F: Fn(T) -> O,
    O: IntoPipe<R>,
    Obs: Fn(&R) -> anyhow::Result<()>,
{
    move |input: T| match stage(input).into_pipe() {
        Pipe::Value(value) => match observer(&value) {
            Ok(()) => Pipe::Value(value),
            Err(cause) => {
                debug!(error = %cause, "observer failed, failing the step");
                Pipe::Failed(cause)
            }
        },
        other => other,
    }
}
