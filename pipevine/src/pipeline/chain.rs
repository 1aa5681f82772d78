//! The asynchronous chain: sequencing stages over a pending carrier.

use crate::core::{IntoPipe, Pipe};
use crate::errors::OffloadAborted;
use crate::stages::Stage;
use crate::terminal::Terminal;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use tracing::{debug, debug_span, Instrument, Span};
use uuid::Uuid;

/// One pipeline execution over a not-yet-resolved carrier.
///
/// A `Chain` unifies the four step shapes (resolved or pending upstream,
/// synchronous or asynchronous stage) behind one asynchronous primitive.
/// Evaluation is strictly sequential: a step's stage is not dispatched until
/// the upstream carrier is fully resolved, and there is no fan-out within
/// one execution. Every combinator delegates to the [`Pipe`] dispatch, so a
/// chain produces the same result as folding the same stages synchronously.
///
/// Each chain carries a `pipeline_run` tracing span with a fresh run id;
/// distinct chains share no state and may run concurrently.
///
/// Cancellation is not provided: a stage that times out should return an
/// error, which becomes ordinary failure state (and is eligible for retry if
/// the stage is decorated).
pub struct Chain<T> {
    fut: BoxFuture<'static, Pipe<T>>,
    span: Span,
}

impl<T: Send + 'static> Chain<T> {
    /// Starts a chain from a resolved value.
    #[must_use]
    pub fn start(value: T) -> Self {
        Self::start_with(Pipe::value(value))
    }

    /// Starts a chain from an already-constructed carrier.
    #[must_use]
    pub fn start_with(pipe: Pipe<T>) -> Self {
        Self {
            fut: std::future::ready(pipe).boxed(),
            span: run_span(),
        }
    }

    /// Starts a chain from a pending carrier.
    #[must_use]
    pub fn from_future<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Pipe<T>> + Send + 'static,
    {
        Self {
            fut: fut.boxed(),
            span: run_span(),
        }
    }

    /// Appends a synchronous stage.
    #[must_use]
    pub fn then<R, O, F>(self, stage: F) -> Chain<R>
    where
        R: Send + 'static,
        O: IntoPipe<R> + Send + 'static,
        F: FnOnce(T) -> O + Send + 'static,
    {
        let Self { fut, span } = self;
        let step = async move { fut.await.then(stage) }.instrument(span.clone());
        Chain {
            fut: step.boxed(),
            span,
        }
    }

    /// Appends an asynchronous stage.
    #[must_use]
    pub fn then_async<R, O, Fut, F>(self, stage: F) -> Chain<R>
    where
        R: Send + 'static,
        O: IntoPipe<R> + Send + 'static,
        Fut: Future<Output = O> + Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
    {
        let Self { fut, span } = self;
        let step = async move { fut.await.then_async(stage).await }.instrument(span.clone());
        Chain {
            fut: step.boxed(),
            span,
        }
    }

    /// Appends a [`Stage`] implementation.
    ///
    /// This is how decorated stages (retry, observers) enter the chain.
    #[must_use]
    pub fn then_stage<R, S>(self, stage: S) -> Chain<R>
    where
        R: Send + 'static,
        S: Stage<T, R> + 'static,
    {
        let Self { fut, span } = self;
        let step = async move {
            let pipe = fut.await;
            pipe.then_async(|input| stage.apply(input)).await
        }
        .instrument(span.clone());
        Chain {
            fut: step.boxed(),
            span,
        }
    }

    /// Appends a synchronous stage that runs on the blocking pool.
    ///
    /// The stage is offloaded with `tokio::task::spawn_blocking`; the chain
    /// still waits for it before proceeding. A panicked or aborted stage
    /// surfaces as `Failed` carrying [`OffloadAborted`], never as a
    /// propagated panic.
    #[must_use]
    pub fn offload<R, O, F>(self, stage: F) -> Chain<R>
    where
        R: Send + 'static,
        O: IntoPipe<R> + Send + 'static,
        F: FnOnce(T) -> O + Send + 'static,
    {
        let Self { fut, span } = self;
        let step = async move {
            let pipe = fut.await;
            pipe.then_async(move |input| async move {
                match tokio::task::spawn_blocking(move || stage(input).into_pipe()).await {
                    Ok(outcome) => outcome,
                    Err(cause) => {
                        debug!(error = %cause, "offloaded stage aborted");
                        Pipe::failed(OffloadAborted::from(cause))
                    }
                }
            })
            .await
        }
        .instrument(span.clone());
        Chain {
            fut: step.boxed(),
            span,
        }
    }

    /// Awaits the pending carrier.
    pub async fn resolve(self) -> Pipe<T> {
        let Self { fut, span } = self;
        fut.instrument(span).await
    }

    /// Terminates the chain: awaits the carrier and collapses it through the
    /// handler. Exactly one of the handler's three operations is invoked.
    pub async fn finish<H>(self, handler: H) -> H::Output
    where
        H: Terminal<T>,
    {
        self.resolve().await.fold(&handler)
    }
}

fn run_span() -> Span {
    debug_span!("pipeline_run", run_id = %Uuid::new_v4())
}
