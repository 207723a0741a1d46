//! Request and response bodies for the console API.

use chrono::{DateTime, Utc};
use guardian_core::IdpConfig;
use guardian_oidc::{AuthState, LoginMethod};
use serde::{Deserialize, Serialize};

/// Query parameters for the user list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListParams {
    /// Case-insensitive search term.
    #[serde(default)]
    pub search: Option<String>,
}

/// Current authentication state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Whether an operator is logged in.
    pub authenticated: bool,
    /// How the operator logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<LoginMethod>,
    /// When the operator logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    /// Whether the identity provider is configured.
    pub configured: bool,
}

impl SessionResponse {
    /// Builds the response from the auth state.
    #[must_use]
    pub fn new(state: AuthState, configured: bool) -> Self {
        Self {
            authenticated: state.is_authenticated(),
            method: state.method(),
            since: state.since(),
            configured,
        }
    }
}

/// Response to a logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    /// Always `false` after logout.
    pub authenticated: bool,
    /// Identity-provider end-session URL, when configured.
    pub logout_url: Option<String>,
}

/// Identity-provider configuration as shown to the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// Configuration with the admin password masked.
    #[serde(flatten)]
    pub config: IdpConfig,
    /// Whether serverUrl, realm and clientId are all set.
    pub configured: bool,
    /// Names of the blank required fields.
    pub missing: Vec<String>,
}

impl ConfigResponse {
    /// Builds the masked view of a configuration.
    #[must_use]
    pub fn new(config: Option<&IdpConfig>) -> Self {
        let config = config.cloned().unwrap_or_default();
        let missing: Vec<String> = config
            .missing_fields()
            .into_iter()
            .map(String::from)
            .collect();
        Self {
            configured: missing.is_empty(),
            missing,
            config: config.masked(),
        }
    }
}

/// Console information returned by `/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleInfo {
    /// Product name.
    pub name: String,
    /// Server version.
    pub version: String,
    /// Whether an operator is logged in.
    pub authenticated: bool,
    /// Whether the identity provider is configured.
    pub configured: bool,
}
