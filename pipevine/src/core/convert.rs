//! Conversion of stage outcomes into the carrier.

use super::Pipe;

/// Conversion from a stage outcome into a [`Pipe`].
///
/// Stages signal their three possible outcomes through ordinary Rust types:
/// absence via `Option`, failure via `Result`, or a ready-made `Pipe` (the
/// shape decorated stages produce). This conversion is the failure boundary
/// of a chain step: a stage error never escapes as an `Err`, it becomes
/// `Pipe::Failed` state.
pub trait IntoPipe<T> {
    /// Converts the outcome into a carrier.
    fn into_pipe(self) -> Pipe<T>;
}

impl<T> IntoPipe<T> for Pipe<T> {
    fn into_pipe(self) -> Pipe<T> {
        self
    }
}

impl<T> IntoPipe<T> for Option<T> {
    fn into_pipe(self) -> Pipe<T> {
        match self {
            Some(value) => Pipe::Value(value),
            None => Pipe::Empty,
        }
    }
}

impl<T, E> IntoPipe<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn into_pipe(self) -> Pipe<T> {
        match self {
            Ok(value) => Pipe::Value(value),
            Err(cause) => Pipe::Failed(cause.into()),
        }
    }
}

impl<T, E> IntoPipe<T> for Result<Option<T>, E>
where
    E: Into<anyhow::Error>,
{
    fn into_pipe(self) -> Pipe<T> {
        match self {
            Ok(Some(value)) => Pipe::Value(value),
            Ok(None) => Pipe::Empty,
            Err(cause) => Pipe::Failed(cause.into()),
        }
    }
}
