//! Error handling for the Guardian console.
//!
//! Error messages are informative for operators but never echo secrets such
//! as the stored admin password.

use thiserror::Error;

/// Result type alias using the console error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for console operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The identity provider has not been configured.
    ///
    /// Lists the required fields that are blank.
    #[error("identity provider not configured (missing: {})", .missing.join(", "))]
    NotConfigured {
        /// Names of the missing fields.
        missing: Vec<&'static str>,
    },

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),
}
