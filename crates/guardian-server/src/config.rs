//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Default location of the identity-provider configuration document.
pub const DEFAULT_CONFIG_FILE: &str = "./guardian-data/keycloak-config.json";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Public origin of the console (used as the OIDC redirect target).
    pub base_url: String,

    /// JSON document holding the saved identity-provider configuration.
    pub config_file: PathBuf,

    /// Timeout for the identity-provider connectivity probe.
    pub probe_timeout: Duration,

    /// CORS allowed origins (comma-separated).
    pub cors_origins: Vec<String>,

    /// Log level.
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("GUARDIAN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("GUARDIAN_PORT") {
            Ok(p) => p
                .parse()
                .map_err(|_| anyhow::anyhow!("GUARDIAN_PORT is not a valid port: {p}"))?,
            Err(_) => 3000,
        };

        let base_url = std::env::var("GUARDIAN_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let config_file = std::env::var("GUARDIAN_CONFIG_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);

        let probe_timeout = std::env::var("GUARDIAN_PROBE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map_or(guardian_oidc::connectivity::DEFAULT_PROBE_TIMEOUT, Duration::from_secs);

        let cors_origins = std::env::var("GUARDIAN_CORS_ORIGINS")
            .map(|s| s.split(',').map(str::trim).map(String::from).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            base_url,
            config_file,
            probe_timeout,
            cors_origins,
            log_level,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing(config_file: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            base_url: "http://localhost:3000".to_string(),
            config_file: config_file.into(),
            probe_timeout: Duration::from_secs(2),
            cors_origins: vec!["*".to_string()],
            log_level: "debug".to_string(),
        }
    }

    /// Sets the public origin.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Console origin without trailing slash, as sent in `redirect_uri`.
    #[must_use]
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Whether any origin is allowed.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            probe_timeout: guardian_oidc::connectivity::DEFAULT_PROBE_TIMEOUT,
            cors_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
        }
    }
}
