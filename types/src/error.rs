//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing or validating domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DobError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("not a recognised date: {0:?}")]
    InvalidDate(String),
}
