//! Test assertions over carrier states.

use crate::core::Pipe;
use std::fmt::Debug;

/// Asserts that the carrier holds a value and returns it.
///
/// # Panics
///
/// Panics if the carrier is `Empty` or `Failed`.
pub fn assert_value<T: Debug>(pipe: Pipe<T>) -> T {
    match pipe {
        Pipe::Value(value) => value,
        other => panic!("expected a value, got {other:?}"),
    }
}

/// Asserts that the carrier is empty.
///
/// # Panics
///
/// Panics if the carrier holds a value or a failure.
pub fn assert_empty<T: Debug>(pipe: &Pipe<T>) {
    assert!(pipe.is_empty(), "expected empty, got {pipe:?}");
}

/// Asserts that the carrier holds a failure and returns the cause.
///
/// # Panics
///
/// Panics if the carrier is `Empty` or holds a value.
pub fn assert_failed<T: Debug>(pipe: Pipe<T>) -> anyhow::Error {
    match pipe {
        Pipe::Failed(cause) => cause,
        other => panic!("expected a failure, got {other:?}"),
    }
}
