//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The console server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// Login required.
    #[error("not logged in: run `guardian login` first")]
    NotLoggedIn,

    /// The identity provider is not configured on the console.
    #[error("identity provider not configured: {0} (run `guardian idp init`)")]
    NotConfigured(String),

    /// API error.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
