//! OIDC flow error types.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while building redirects or probing the identity provider.
#[derive(Debug, Error)]
pub enum OidcError {
    /// One of serverUrl, realm or clientId is blank.
    #[error("identity provider not configured (missing: {})", .missing.join(", "))]
    NotConfigured {
        /// Names of the missing fields.
        missing: Vec<&'static str>,
    },

    /// A URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The identity provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),

    /// The identity provider did not answer in time.
    #[error("identity provider did not respond within {0:?}")]
    Timeout(Duration),

    /// The discovery endpoint answered with a non-success status.
    #[error("unexpected status {0} from discovery endpoint")]
    UnexpectedStatus(u16),

    /// The discovery document was not usable.
    #[error("invalid discovery document: {0}")]
    InvalidDiscovery(String),

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl OidcError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured { .. } => "not_configured",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Unreachable(_) => "unreachable",
            Self::Timeout(_) => "timeout",
            Self::UnexpectedStatus(_) => "unexpected_status",
            Self::InvalidDiscovery(_) => "invalid_discovery",
            Self::Client(_) => "client_error",
        }
    }
}

impl From<guardian_core::Error> for OidcError {
    fn from(err: guardian_core::Error) -> Self {
        match err {
            guardian_core::Error::NotConfigured { missing } => Self::NotConfigured { missing },
            other => Self::Client(other.to_string()),
        }
    }
}

impl From<url::ParseError> for OidcError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Result type for OIDC operations.
pub type OidcResult<T> = Result<T, OidcError>;
