//! Core carrier type for pipevine.
//!
//! This module contains the fundamental types the rest of the crate is built
//! on:
//! - The tri-state carrier [`Pipe`]
//! - The [`IntoPipe`] conversion for stage outcomes

mod convert;
mod pipe;

pub use convert::IntoPipe;
pub use pipe::Pipe;
