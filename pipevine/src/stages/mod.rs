//! Stage trait and function adapters.
//!
//! A stage is one caller-supplied transformation applied at a chain step.
//! The [`Stage`] trait is the canonical shape decorators compose over,
//! uniform for synchronous and asynchronous logic; [`from_fn`] and
//! [`from_async`] lift plain closures into it.

use crate::core::{IntoPipe, Pipe};
use crate::interceptors::{Attempts, Including, Retry, TryIncluding};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;

/// Trait for pipeline stages.
///
/// A stage maps an input payload to an outcome carrier. Implementations must
/// be safe for concurrent invocation: one stage value may serve many pipeline
/// executions at once.
#[async_trait]
pub trait Stage<T, R>: Send + Sync
where
    T: Send + 'static,
    R: Send + 'static,
{
    /// Applies the stage to one input.
    async fn apply(&self, input: T) -> Pipe<R>;
}

/// A synchronous function-based stage.
pub struct FnStage<F> {
    func: F,
}

/// Lifts a synchronous closure into a [`Stage`].
///
/// The closure may return any [`IntoPipe`] outcome: `Option`, `Result`,
/// `Result<Option<_>, _>`, or a ready-made [`Pipe`].
pub fn from_fn<T, R, O, F>(func: F) -> FnStage<impl Fn(T) -> Pipe<R> + Send + Sync>
where
    F: Fn(T) -> O + Send + Sync,
    O: IntoPipe<R>,
{
    FnStage {
        func: move |input| func(input).into_pipe(),
    }
}

#[async_trait]
impl<T, R, F> Stage<T, R> for FnStage<F>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Pipe<R> + Send + Sync,
{
    async fn apply(&self, input: T) -> Pipe<R> {
        (self.func)(input)
    }
}

/// An asynchronous function-based stage.
pub struct AsyncFnStage<F> {
    func: F,
}

/// Lifts a future-returning closure into a [`Stage`].
pub fn from_async<T, R, O, Fut, F>(
    func: F,
) -> AsyncFnStage<impl Fn(T) -> BoxFuture<'static, Pipe<R>> + Send + Sync>
where
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = O> + Send + 'static,
    O: IntoPipe<R> + 'static,
    R: Send + 'static,
{
    AsyncFnStage {
        func: move |input| func(input).map(IntoPipe::into_pipe).boxed(),
    }
}

#[async_trait]
impl<T, R, F> Stage<T, R> for AsyncFnStage<F>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> BoxFuture<'static, Pipe<R>> + Send + Sync,
{
    async fn apply(&self, input: T) -> Pipe<R> {
        (self.func)(input).await
    }
}

/// Composes two plain mappings into one, applying `inner` first.
///
/// Useful for fusing adjacent transformations into a single stage function
/// before lifting it with [`from_fn`].
pub fn compose<A, B, C, Inner, Outer>(outer: Outer, inner: Inner) -> impl Fn(A) -> C
where
    Inner: Fn(A) -> B,
    Outer: Fn(B) -> C,
{
    move |input| outer(inner(input))
}

/// Decorator sugar for stages.
///
/// Mirrors the chain DSL: `from_fn(authorize).including(audit).retrying(n)`.
pub trait StageExt<T, R>: Stage<T, R> + Sized
where
    T: Send + 'static,
    R: Send + 'static,
{
    /// Wraps the stage so failures are re-attempted up to the bound.
    fn retrying(self, up_to: Attempts) -> Retry<Self> {
        Retry::new(self, up_to)
    }

    /// Attaches an infallible side-effect observer to the stage's value.
    fn including<Obs>(self, observer: Obs) -> Including<Self, Obs>
    where
        Obs: Fn(&R) + Send + Sync,
    {
        Including::new(self, observer)
    }

    /// Attaches a fallible observer; its error fails the step.
    fn try_including<Obs>(self, observer: Obs) -> TryIncluding<Self, Obs>
    where
        Obs: Fn(&R) -> anyhow::Result<()> + Send + Sync,
    {
        TryIncluding::new(self, observer)
    }
}

impl<T, R, S> StageExt<T, R> for S
where
    T: Send + 'static,
    R: Send + 'static,
    S: Stage<T, R>,
{
}
