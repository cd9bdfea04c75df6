//! Domain-level errors.
//!
//! These mirror the failure kinds the coordination layer can report. They are
//! independent of transport; `common::AppError` maps them to HTTP and gRPC.

use thiserror::Error;

/// Failures raised while serving an HR resource request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No record exists for the requested key
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller lacks the permission required for the resource
    #[error("Permission denied: {0}")]
    Permission(String),

    /// A request argument was missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing store failed to read the data
    #[error("Repository error: {0}")]
    Repository(String),

    /// The data could not be converted into the integration representation
    #[error("Integration error: {0}")]
    Integration(String),

    /// The caller's session is no longer valid
    #[error("Session expired")]
    SessionExpired,

    /// The operation is not supported for this resource
    #[error("Operation not supported")]
    NotSupported,

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(key: impl Into<String>) -> Self {
        DomainError::NotFound(key.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        DomainError::Permission(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DomainError::InvalidArgument(msg.into())
    }

    pub fn repository(msg: impl Into<String>) -> Self {
        DomainError::Repository(msg.into())
    }

    pub fn integration(msg: impl Into<String>) -> Self {
        DomainError::Integration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
