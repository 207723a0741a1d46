//! Authorization and logout URL construction.
//!
//! URLs are built by plain interpolation over a complete [`IdpConfig`]:
//!
//! ```text
//! {serverUrl}/realms/{realm}/protocol/openid-connect/auth
//!     ?client_id=...&redirect_uri=...&response_type=code&scope=openid
//! ```
//!
//! Query values are percent-encoded. An incomplete configuration yields
//! [`OidcError::NotConfigured`] instead of a malformed URL.

use guardian_core::IdpConfig;

use crate::error::OidcResult;

/// Resolved endpoint locations for one realm and client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidcEndpoints {
    realm_base: String,
    client_id: String,
}

impl OidcEndpoints {
    /// Resolves endpoints from the configuration.
    ///
    /// ## Errors
    ///
    /// Returns `OidcError::NotConfigured` when serverUrl, realm or clientId
    /// is blank.
    pub fn from_config(config: &IdpConfig) -> OidcResult<Self> {
        config.require_complete()?;
        Ok(Self {
            realm_base: format!(
                "{}/realms/{}",
                config.server_base(),
                urlencoding::encode(config.realm.trim())
            ),
            client_id: config.client_id.trim().to_string(),
        })
    }

    /// `{serverUrl}/realms/{realm}`.
    #[must_use]
    pub fn realm_base(&self) -> &str {
        &self.realm_base
    }

    /// The client ID used in every request.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Authorization endpoint URL sending the operator back to `redirect_uri`.
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str) -> String {
        let query = encode_params(&[
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", "openid"),
        ]);
        format!("{}/protocol/openid-connect/auth?{query}", self.realm_base)
    }

    /// End-session endpoint URL returning the operator to
    /// `post_logout_redirect_uri`.
    #[must_use]
    pub fn logout_url(&self, post_logout_redirect_uri: &str) -> String {
        let query = encode_params(&[
            ("client_id", self.client_id.as_str()),
            ("post_logout_redirect_uri", post_logout_redirect_uri),
        ]);
        format!("{}/protocol/openid-connect/logout?{query}", self.realm_base)
    }

    /// Location of the realm's discovery document.
    #[must_use]
    pub fn discovery_url(&self) -> String {
        format!("{}/.well-known/openid-configuration", self.realm_base)
    }
}

/// Encodes `key=value` pairs joined by `&`.
fn encode_params(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
