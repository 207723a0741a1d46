//! Identity-provider connectivity probe.
//!
//! Fetches the realm's discovery document with an explicit timeout. A
//! reachable, correctly configured realm answers with a JSON document that
//! carries an `issuer`.

use std::time::Duration;

use guardian_core::IdpConfig;
use serde::{Deserialize, Serialize};

use crate::error::{OidcError, OidcResult};
use crate::redirect::OidcEndpoints;

/// Default probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// The parts of the discovery document the console reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Issuer identifier.
    pub issuer: String,
    /// Authorization endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_endpoint: Option<String>,
    /// End-session endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_session_endpoint: Option<String>,
}

/// Outcome of a connectivity test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// The provider answered correctly.
    Success,
    /// The provider could not be used.
    Error,
}

/// Result of a connectivity test, ready to be shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    /// Test status.
    pub status: TestStatus,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code, on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Discovered provider details, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderInfo>,
    /// Round-trip time in milliseconds.
    pub elapsed_ms: u64,
}

impl ConnectionReport {
    /// Builds a report from a probe result.
    #[must_use]
    pub fn from_result(result: &OidcResult<ProviderInfo>, elapsed: Duration) -> Self {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(info) => Self {
                status: TestStatus::Success,
                message: format!("Connected to {}", info.issuer),
                error: None,
                provider: Some(info.clone()),
                elapsed_ms,
            },
            Err(e) => Self {
                status: TestStatus::Error,
                message: e.to_string(),
                error: Some(e.error_code().to_string()),
                provider: None,
                elapsed_ms,
            },
        }
    }
}

/// HTTP probe of the identity provider.
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl ConnectivityProbe {
    /// Creates a probe with the given request timeout.
    pub fn new(timeout: Duration) -> OidcResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OidcError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    /// The configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches and validates the discovery document.
    ///
    /// ## Errors
    ///
    /// - `NotConfigured` when the configuration is incomplete
    /// - `Timeout` / `Unreachable` on transport failures
    /// - `UnexpectedStatus` on a non-2xx answer
    /// - `InvalidDiscovery` when the body is not a usable discovery document
    pub async fn check(&self, config: &IdpConfig) -> OidcResult<ProviderInfo> {
        let url = OidcEndpoints::from_config(config)?.discovery_url();
        tracing::debug!(%url, "probing identity provider");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OidcError::UnexpectedStatus(status.as_u16()));
        }

        let info: ProviderInfo = response.json().await.map_err(|e| {
            if e.is_timeout() {
                OidcError::Timeout(self.timeout)
            } else {
                OidcError::InvalidDiscovery(e.to_string())
            }
        })?;

        if info.issuer.trim().is_empty() {
            return Err(OidcError::InvalidDiscovery("empty issuer".to_string()));
        }

        Ok(info)
    }

    /// Runs [`check`](Self::check) and summarizes the outcome.
    ///
    /// The raw result is returned alongside the report so callers can map
    /// the typed error.
    pub async fn report(
        &self,
        config: &IdpConfig,
    ) -> (OidcResult<ProviderInfo>, ConnectionReport) {
        let started = std::time::Instant::now();
        let result = self.check(config).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "identity provider connectivity test failed");
        }
        let report = ConnectionReport::from_result(&result, started.elapsed());
        (result, report)
    }

    fn transport_error(&self, err: &reqwest::Error) -> OidcError {
        if err.is_timeout() {
            OidcError::Timeout(self.timeout)
        } else {
            OidcError::Unreachable(err.to_string())
        }
    }
}
