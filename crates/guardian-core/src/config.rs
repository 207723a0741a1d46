//! Identity-provider configuration.
//!
//! The console talks to exactly one Keycloak-style identity provider. Its
//! coordinates are held in a single [`IdpConfig`] object that is created by
//! the settings form, persisted verbatim under [`CONFIG_STORAGE_KEY`] and read
//! back on startup. It can also be sourced from the environment.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key under which the configuration object is persisted.
pub const CONFIG_STORAGE_KEY: &str = "keycloak-config";

/// Placeholder shown instead of a stored password.
pub const MASKED_SECRET: &str = "****";

/// Environment variable holding the identity-provider base URL.
pub const ENV_SERVER_URL: &str = "GUARDIAN_KEYCLOAK_URL";
/// Environment variable holding the realm name.
pub const ENV_REALM: &str = "GUARDIAN_KEYCLOAK_REALM";
/// Environment variable holding the client ID.
pub const ENV_CLIENT_ID: &str = "GUARDIAN_KEYCLOAK_CLIENT_ID";
/// Environment variable holding the admin username.
pub const ENV_ADMIN_USERNAME: &str = "GUARDIAN_KEYCLOAK_ADMIN_USERNAME";
/// Environment variable holding the admin password.
pub const ENV_ADMIN_PASSWORD: &str = "GUARDIAN_KEYCLOAK_ADMIN_PASSWORD";

/// Connection settings for the identity provider.
///
/// Serialized in camelCase so the persisted document keeps the shape
/// `{serverUrl, realm, clientId, adminUsername, adminPassword}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpConfig {
    /// Identity-provider base URL (e.g., `http://localhost:8080`).
    #[serde(default)]
    pub server_url: String,
    /// Realm name.
    #[serde(default)]
    pub realm: String,
    /// Client ID registered in the realm.
    #[serde(default)]
    pub client_id: String,
    /// Optional admin username for administrative API calls.
    #[serde(default)]
    pub admin_username: String,
    /// Optional admin password. Stored in plaintext.
    #[serde(default)]
    pub admin_password: String,
}

impl IdpConfig {
    /// Creates a configuration with the three required fields.
    #[must_use]
    pub fn new(
        server_url: impl Into<String>,
        realm: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            realm: realm.into(),
            client_id: client_id.into(),
            ..Self::default()
        }
    }

    /// Values pre-filled in a fresh settings form.
    #[must_use]
    pub fn form_defaults() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            realm: "master".to_string(),
            client_id: "admin-cli".to_string(),
            admin_username: "admin".to_string(),
            admin_password: String::new(),
        }
    }

    /// Sets the admin credentials.
    #[must_use]
    pub fn with_admin(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin_username = username.into();
        self.admin_password = password.into();
        self
    }

    /// Loads the configuration from the process environment.
    ///
    /// Returns `None` when none of the variables are set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// Returns `None` when the lookup yields nothing for every variable.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = lookup(ENV_SERVER_URL);
        let realm = lookup(ENV_REALM);
        let client_id = lookup(ENV_CLIENT_ID);
        let admin_username = lookup(ENV_ADMIN_USERNAME);
        let admin_password = lookup(ENV_ADMIN_PASSWORD);

        if server_url.is_none()
            && realm.is_none()
            && client_id.is_none()
            && admin_username.is_none()
            && admin_password.is_none()
        {
            return None;
        }

        Some(Self {
            server_url: server_url.unwrap_or_default(),
            realm: realm.unwrap_or_default(),
            client_id: client_id.unwrap_or_default(),
            admin_username: admin_username.unwrap_or_default(),
            admin_password: admin_password.unwrap_or_default(),
        })
    }

    /// Returns the names of the required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.server_url.trim().is_empty() {
            missing.push("serverUrl");
        }
        if self.realm.trim().is_empty() {
            missing.push("realm");
        }
        if self.client_id.trim().is_empty() {
            missing.push("clientId");
        }
        missing
    }

    /// Checks whether all required fields are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Fails with [`Error::NotConfigured`] unless the configuration is complete.
    pub fn require_complete(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::NotConfigured { missing })
        }
    }

    /// Server URL without trailing slashes.
    #[must_use]
    pub fn server_base(&self) -> &str {
        self.server_url.trim().trim_end_matches('/')
    }

    /// Returns a copy safe to display, with the password masked.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if !copy.admin_password.is_empty() {
            copy.admin_password = MASKED_SECRET.to_string();
        }
        copy
    }

    /// Sets a single field by name.
    ///
    /// Accepts both the persisted camelCase names and snake_case aliases.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "serverUrl" | "server_url" | "server" => self.server_url = value.to_string(),
            "realm" => self.realm = value.to_string(),
            "clientId" | "client_id" | "client" => self.client_id = value.to_string(),
            "adminUsername" | "admin_username" => self.admin_username = value.to_string(),
            "adminPassword" | "admin_password" => self.admin_password = value.to_string(),
            _ => {
                return Err(Error::Validation(format!(
                    "unknown configuration key: {key}. Known keys: serverUrl, realm, clientId, adminUsername, adminPassword"
                )));
            }
        }
        Ok(())
    }
}
