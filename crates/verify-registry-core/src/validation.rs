//! Argument validation shared by the registries and the selector builder.

use crate::error::ValidationError;

/// Default upper bound on a value embedded in a selector, in bytes.
pub const DEFAULT_MAX_VALUE_LEN: usize = 4096;

/// Reject empty required arguments.
pub fn require_non_empty(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyArgument(name));
    }
    Ok(())
}

/// Check that a value can be embedded in a selector.
///
/// Quotes and backslashes are fine since values are JSON-escaped on
/// rendering. Control characters are rejected outright, as is anything
/// longer than `max_len` bytes.
pub fn validate_selector_value(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), ValidationError> {
    if value.len() > max_len {
        return Err(ValidationError::ValueTooLong {
            field,
            len: value.len(),
            max: max_len,
        });
    }
    if let Some(ch) = value.chars().find(|c| c.is_control()) {
        return Err(ValidationError::UnsafeCharacter { field, ch });
    }
    Ok(())
}
