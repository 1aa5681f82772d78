//! Mock stage wrappers for testing.

use crate::core::Pipe;
use crate::stages::Stage;
use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A stage wrapper that counts invocations.
///
/// The counter handle is cloned out before the stage moves into a chain, so
/// the test can assert on it afterwards.
pub struct CountingStage<S> {
    inner: S,
    calls: Arc<AtomicU32>,
}

impl<S> CountingStage<S> {
    /// Wraps a stage with an invocation counter.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Returns a handle to the invocation counter.
    #[must_use]
    pub fn counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }

    /// Returns the number of invocations so far.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T, R, S> Stage<T, R> for CountingStage<S>
where
    T: Send + 'static,
    R: Send + 'static,
    S: Stage<T, R>,
{
    async fn apply(&self, input: T) -> Pipe<R> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.apply(input).await
    }
}

/// A stage wrapper that fails its first invocations, then delegates.
///
/// Useful for exercising retry bounds: the wrapper fails `fail_first` times
/// with a numbered message before letting the inner stage run.
pub struct FlakyStage<S> {
    inner: S,
    message: String,
    fail_first: u32,
    calls: AtomicU32,
}

impl<S> FlakyStage<S> {
    /// Wraps a stage so its first `fail_first` calls fail with `message`.
    pub fn new(inner: S, fail_first: u32, message: impl Into<String>) -> Self {
        Self {
            inner,
            message: message.into(),
            fail_first,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl<T, R, S> Stage<T, R> for FlakyStage<S>
where
    T: Send + 'static,
    R: Send + 'static,
    S: Stage<T, R>,
{
    async fn apply(&self, input: T) -> Pipe<R> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.fail_first {
            Pipe::failed(anyhow!("{} (attempt {call})", self.message))
        } else {
            self.inner.apply(input).await
        }
    }
}
