//! Error types for the counting Bloom filter

use thiserror::Error;

/// Errors raised while constructing, decoding or loading a filter.
///
/// Mutation and query never fail: counter overflow saturates and
/// over-deletion floors at zero.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Truncated filter encoding: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Trailing bytes after filter encoding: {extra}")]
    TrailingBytes { extra: usize },

    #[error("Corrupt counter at index {index}: {value}")]
    CorruptCounter { index: usize, value: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        FilterError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
