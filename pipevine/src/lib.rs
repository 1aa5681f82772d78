//! # Pipevine
//!
//! Composable fallible pipeline combinators.
//!
//! Pipevine chains a sequence of fallible, optionally asynchronous
//! transformation stages over a value. Each step propagates two
//! short-circuiting states, no value and failure with a cause, and every
//! chain ends with a mandatory exhaustive handler, so failure handling can
//! never be forgotten:
//!
//! - **Carrier**: the tri-state [`core::Pipe`] (`Empty` / `Value` / `Failed`)
//! - **Chaining**: [`pipeline::Chain`] sequences sync, async, and offloaded
//!   stages over a pending carrier
//! - **Decorators**: retry with a fixed attempt bound, and side-effect
//!   observers that leave the stage's result unchanged
//! - **Terminal**: the [`terminal::Terminal`] handler collapses the carrier
//!   into the pipeline's public output
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pipevine::prelude::*;
//!
//! let response = Chain::start(request)
//!     .then_stage(from_fn(authenticate).including(audit))
//!     .then_stage(from_fn(authorize).retrying(Attempts::new(2)?))
//!     .then_async(process)
//!     .finish(handlers(
//!         || Response::no_content(),
//!         Response::ok,
//!         Response::from_error,
//!     ))
//!     .await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod interceptors;
pub mod pipeline;
pub mod stages;
pub mod terminal;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{IntoPipe, Pipe};
    pub use crate::errors::{InvalidBound, OffloadAborted};
    pub use crate::interceptors::{
        including, retrying, try_including, Attempts, Including, Retry, TryIncluding,
    };
    pub use crate::pipeline::Chain;
    pub use crate::stages::{compose, from_async, from_fn, AsyncFnStage, FnStage, Stage, StageExt};
    pub use crate::terminal::{handlers, Handlers, Terminal};
}
