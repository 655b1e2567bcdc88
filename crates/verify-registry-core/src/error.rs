//! Error types for the verify registry core.

use thiserror::Error;

/// Errors from encoding, decoding and selector parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("record type mismatch: expected {expected}, got {actual}")]
    RecordTypeMismatch { expected: String, actual: String },

    #[error("malformed selector: {0}")]
    MalformedSelector(String),
}

/// Argument and selector-value validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must be a non-empty string")]
    EmptyArgument(&'static str),

    #[error("{field} contains a character that cannot be embedded in a selector: {ch:?}")]
    UnsafeCharacter { field: &'static str, ch: char },

    #[error("{field} is {len} bytes, exceeding the maximum of {max}")]
    ValueTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("selector accepts at most {max} fields besides the record type")]
    TooManyPredicates { max: usize },
}
