//! Console API error types.
//!
//! Maps library errors to HTTP responses with an
//! `{error, error_description}` body.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use guardian_model::DirectoryError;
use guardian_oidc::OidcError;
use guardian_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

/// Errors returned by console handlers.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Resource not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entity (e.g., "User").
        entity_type: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Login required.
    #[error("Authentication required")]
    Unauthorized,

    /// The identity provider refused the login.
    #[error("Login rejected by identity provider: {error}")]
    LoginRejected {
        /// Error code returned by the provider.
        error: String,
        /// Description returned by the provider.
        description: Option<String>,
    },

    /// The identity provider is not configured.
    #[error("Identity provider not configured (missing: {})", .missing.join(", "))]
    NotConfigured {
        /// Names of the missing fields.
        missing: Vec<&'static str>,
    },

    /// The identity provider could not be used.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Storage layer error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::LoginRejected { .. } => StatusCode::UNAUTHORIZED,
            Self::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Connection(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(err) => match err {
                StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
                StorageError::Duplicate { .. } => StatusCode::CONFLICT,
                StorageError::InvalidData(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Unauthorized => "unauthorized",
            Self::LoginRejected { .. } => "login_rejected",
            Self::NotConfigured { .. } => "not_configured",
            Self::Connection(_) => "connection_error",
            Self::Storage(err) => match err {
                StorageError::NotFound { .. } => "not_found",
                StorageError::Duplicate { .. } => "conflict",
                StorageError::InvalidData(_) => "validation_error",
                _ => "internal_error",
            },
            Self::Internal(_) => "internal_error",
        }
    }

    /// Level at which a failed request is logged, if at all.
    ///
    /// `503 not_configured` is expected until the provider is set up.
    #[must_use]
    pub fn log_level(&self) -> Option<Level> {
        let status = self.status_code();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            Some(Level::WARN)
        } else if status.is_server_error() {
            Some(Level::ERROR)
        } else {
            None
        }
    }
}

impl From<OidcError> for ConsoleError {
    fn from(err: OidcError) -> Self {
        match err {
            OidcError::NotConfigured { missing } => Self::NotConfigured { missing },
            OidcError::InvalidUrl(msg) => Self::Validation(msg),
            OidcError::Client(msg) => Self::Internal(msg),
            other => Self::Connection(other.to_string()),
        }
    }
}

impl From<DirectoryError> for ConsoleError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::InvalidDraft(msg) => Self::Validation(msg),
            other => Self::Storage(other.into()),
        }
    }
}

impl From<guardian_core::Error> for ConsoleError {
    fn from(err: guardian_core::Error) -> Self {
        match err {
            guardian_core::Error::NotConfigured { missing } => Self::NotConfigured { missing },
            guardian_core::Error::Validation(msg) => Self::Validation(msg),
        }
    }
}

impl From<JsonRejection> for ConsoleError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self.log_level() {
            Some(level) if level == Level::WARN => {
                tracing::warn!(error = %self, "request failed");
            }
            Some(_) => tracing::error!(error = %self, "request failed"),
            None => {}
        }
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for console handlers.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
