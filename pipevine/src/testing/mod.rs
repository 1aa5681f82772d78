//! Testing utilities for pipevine chains.
//!
//! This module provides:
//! - Counting and flaky stage wrappers
//! - Assertions over carrier states
//! - Tracing initialization for test diagnostics

mod assertions;
mod mocks;

pub use assertions::{assert_empty, assert_failed, assert_value};
pub use mocks::{CountingStage, FlakyStage};

/// Initializes a tracing subscriber for tests.
///
/// Reads the filter from `RUST_LOG`; repeated calls are tolerated.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
