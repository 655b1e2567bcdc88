//! Error types for the registry.

use verify_registry_core::{CoreError, ValidationError};
use verify_registry_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// Every error is terminal for the operation that raised it. Nothing is
/// retried inside the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Wrong argument count, empty required field, or a value that cannot be
    /// embedded in a selector.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A record already exists under the key being created.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The record being updated does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The underlying store failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(StoreError),

    /// Stored bytes did not decode into the expected shape.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The dispatcher does not know the operation name.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

impl From<StoreError> for RegistryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidSelector(msg) => RegistryError::InvalidArgument(msg),
            other => RegistryError::StoreUnavailable(other),
        }
    }
}

impl From<ValidationError> for RegistryError {
    fn from(e: ValidationError) -> Self {
        RegistryError::InvalidArgument(e.to_string())
    }
}

impl From<CoreError> for RegistryError {
    fn from(e: CoreError) -> Self {
        RegistryError::Serialization(e.to_string())
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
