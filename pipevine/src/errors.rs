//! Error types for the pipevine crate.
//!
//! The pipeline itself has exactly two non-success states, absence and
//! failure-with-cause, so this module only covers the crate's own
//! construction and runtime errors. Domain failures travel opaquely inside
//! the carrier's `anyhow::Error` cause.

use thiserror::Error;

/// Error returned when a retry bound of zero is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("retry bound must be positive, got {got}")]
pub struct InvalidBound {
    /// The rejected bound.
    pub got: u32,
}

/// Error carried as the failure cause when an offloaded stage panics or is
/// aborted before producing an outcome.
#[derive(Debug, Error)]
#[error("offloaded stage aborted: {source}")]
pub struct OffloadAborted {
    /// The join failure from the blocking task.
    #[from]
    source: tokio::task::JoinError,
}
