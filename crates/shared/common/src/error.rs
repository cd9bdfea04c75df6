//! Unified error handling for HTTP and gRPC.
//!
//! `AppError` is the one place where a failure kind becomes a status code.
//! It converts to:
//! - Axum HTTP responses carrying the integration error payload (gateway)
//! - Tonic gRPC status codes (hr-service), and back again (gateway client)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{
    DomainError, NOT_SUPPORTED_MESSAGE, NULL_GUID_MESSAGE, SESSION_EXPIRED_MESSAGE,
    UNEXPECTED_ERROR_MESSAGE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonic::Status;

/// Application error types with support for both HTTP and gRPC.
#[derive(Error, Debug)]
pub enum AppError {
    // Lookup
    #[error("{0}")]
    NotFound(String),

    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Session expired")]
    SessionExpired,

    #[error("{0}")]
    Forbidden(String),

    // Request problems
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unsupported media type version: {0}")]
    NotAcceptable(String),

    #[error("Operation not supported")]
    NotSupported,

    // Service layer failures
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Integration error: {0}")]
    Integration(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[cfg(feature = "cache")]
    #[error("Cache error")]
    Cache(#[from] redis::RedisError),

    // Transport
    #[error("Service unavailable")]
    ServiceUnavailable(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Integration error payload: `{"errors":[{code,message,description}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "GUID.Not.Found",
            AppError::Unauthorized => "Authentication.Required",
            AppError::SessionExpired => "Session.Expired",
            AppError::Forbidden(_) => "Access.Denied",
            AppError::InvalidArgument(_) => "Validation.Exception",
            AppError::NotAcceptable(_) => "Invalid.MediaType",
            AppError::NotSupported => "Global.Internal.Error",
            AppError::Repository(_) => "Repository.Error",
            AppError::Integration(_) => "Integration.Error",
            AppError::Unexpected(_) => "Global.Internal.Error",
            #[cfg(feature = "database")]
            AppError::Database(_) => "Repository.Error",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "Authentication.Required",
            #[cfg(feature = "cache")]
            AppError::Cache(_) => "Repository.Error",
            AppError::ServiceUnavailable(_) => "Service.Unavailable",
            AppError::Internal(_) => "Global.Internal.Error",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized | AppError::SessionExpired => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidArgument(_)
            | AppError::Repository(_)
            | AppError::Integration(_)
            | AppError::Unexpected(_) => StatusCode::BAD_REQUEST,
            #[cfg(feature = "database")]
            AppError::Database(_) => StatusCode::BAD_REQUEST,
            #[cfg(feature = "cache")]
            AppError::Cache(_) => StatusCode::BAD_REQUEST,
            AppError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            AppError::NotSupported => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            AppError::NotSupported => NOT_SUPPORTED_MESSAGE.to_string(),
            AppError::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
            #[cfg(feature = "database")]
            AppError::Database(_) => "A repository error occurred".to_string(),
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "Invalid or expired token".to_string(),
            #[cfg(feature = "cache")]
            AppError::Cache(_) => "A repository error occurred".to_string(),
            AppError::ServiceUnavailable(service) => {
                format!("Service {} is unavailable", service)
            }
            AppError::Internal(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }

    /// Build the integration error payload for this error.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            errors: vec![ErrorEntry {
                code: self.code().to_string(),
                message: self.user_message(),
                description: self.description(),
            }],
        }
    }

    fn description(&self) -> Option<String> {
        match self {
            AppError::NotFound(_) => Some("No record exists for the requested GUID.".to_string()),
            AppError::NotSupported => {
                Some("The resource does not accept this operation at the requested version.".to_string())
            }
            AppError::NotAcceptable(_) => {
                Some("The Accept header requests a version this resource does not serve.".to_string())
            }
            _ => None,
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), status = status.as_u16(), "{:?}", self);
        } else {
            tracing::error!(code = self.code(), status = status.as_u16(), "{}", self);
        }

        (status, Json(self.payload())).into_response()
    }
}

// =============================================================================
// gRPC Status (Tonic)
// =============================================================================

impl From<AppError> for Status {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::NotFound(_) => tonic::Code::NotFound,
            AppError::Unauthorized | AppError::SessionExpired => tonic::Code::Unauthenticated,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => tonic::Code::Unauthenticated,
            AppError::Forbidden(_) => tonic::Code::PermissionDenied,
            AppError::InvalidArgument(_) | AppError::NotAcceptable(_) => {
                tonic::Code::InvalidArgument
            }
            AppError::NotSupported => tonic::Code::Unimplemented,
            AppError::Repository(_) => tonic::Code::FailedPrecondition,
            #[cfg(feature = "database")]
            AppError::Database(_) => tonic::Code::FailedPrecondition,
            #[cfg(feature = "cache")]
            AppError::Cache(_) => tonic::Code::FailedPrecondition,
            AppError::Integration(_) => tonic::Code::Aborted,
            AppError::Unexpected(_) => tonic::Code::Unknown,
            AppError::ServiceUnavailable(_) => tonic::Code::Unavailable,
            AppError::Internal(_) => tonic::Code::Internal,
        };

        // Details cross the service boundary; the gateway decides what users see.
        Status::new(code, err.to_string())
    }
}

impl From<Status> for AppError {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            tonic::Code::NotFound => AppError::NotFound(message),
            tonic::Code::PermissionDenied => AppError::Forbidden(message),
            tonic::Code::Unauthenticated => AppError::SessionExpired,
            tonic::Code::InvalidArgument | tonic::Code::OutOfRange => {
                AppError::InvalidArgument(message)
            }
            tonic::Code::FailedPrecondition => AppError::Repository(message),
            tonic::Code::Aborted => AppError::Integration(message),
            tonic::Code::Unimplemented => AppError::NotSupported,
            tonic::Code::Unavailable | tonic::Code::DeadlineExceeded => {
                AppError::ServiceUnavailable(message)
            }
            _ => AppError::Unexpected(message),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(key) => AppError::NotFound(key),
            DomainError::Permission(msg) => AppError::Forbidden(msg),
            DomainError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            DomainError::Repository(msg) => AppError::Repository(msg),
            DomainError::Integration(msg) => AppError::Integration(msg),
            DomainError::SessionExpired => AppError::SessionExpired,
            DomainError::NotSupported => AppError::NotSupported,
            DomainError::Internal(msg) => AppError::Unexpected(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, key: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, key: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("No record found for {}", key)))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(key: impl Into<String>) -> Self {
        AppError::NotFound(key.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    /// The 400 returned when a resource is requested without a GUID.
    pub fn null_guid() -> Self {
        AppError::InvalidArgument(NULL_GUID_MESSAGE.to_string())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn service_unavailable(service: impl Into<String>) -> Self {
        AppError::ServiceUnavailable(service.into())
    }
}
