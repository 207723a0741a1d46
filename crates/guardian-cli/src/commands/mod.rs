//! Command implementations.

pub mod config;
pub mod idp;
pub mod session;
pub mod user;

pub use config::run_config;
pub use idp::run_idp;
pub use session::{run_dashboard, run_login, run_logout, run_session, run_status};
pub use user::run_user;

use reqwest::{redirect::Policy, StatusCode};
use serde::Deserialize;

use crate::{CliConfig, CliError};

/// Error body returned by the console API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// API client for making requests to the console server.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new API client.
    ///
    /// Redirects are not followed so that `/login` reveals the identity
    /// provider URL instead of fetching it.
    pub fn new(config: &CliConfig, server_override: Option<&str>) -> crate::CliResult<Self> {
        let base_url = server_override
            .unwrap_or(&config.server_url)
            .trim_end_matches('/')
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .redirect(Policy::none())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Makes a GET request.
    pub async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> crate::CliResult<T> {
        let response = self.send(self.client.get(self.url(path))).await?;
        handle_response(response).await
    }

    /// Makes a GET request expecting a redirect and returns its target.
    pub async fn get_redirect(&self, path: &str) -> crate::CliResult<String> {
        let response = self.send(self.client.get(self.url(path))).await?;
        if response.status().is_redirection() {
            return response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
                .ok_or_else(|| CliError::Api {
                    status: response.status().as_u16(),
                    message: "redirect without location".to_string(),
                });
        }
        Err(error_from_response(response).await)
    }

    /// Makes a POST request with a JSON body.
    pub async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> crate::CliResult<T> {
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        handle_response(response).await
    }

    /// Makes a POST request without a body.
    pub async fn post_empty<T: serde::de::DeserializeOwned>(&self, path: &str) -> crate::CliResult<T> {
        let response = self.send(self.client.post(self.url(path))).await?;
        handle_response(response).await
    }

    /// Makes a PUT request.
    pub async fn put<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> crate::CliResult<T> {
        let response = self.send(self.client.put(self.url(path)).json(body)).await?;
        handle_response(response).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> crate::CliResult<()> {
        let response = self.send(self.client.delete(self.url(path))).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> crate::CliResult<reqwest::Response> {
        request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                CliError::Connection(format!("{}: {e}", self.base_url))
            } else {
                CliError::Http(e)
            }
        })
    }
}

/// Handles a response with a body.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> crate::CliResult<T> {
    if response.status().is_success() {
        response.json().await.map_err(CliError::Http)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Maps an error response to a CLI error.
async fn error_from_response(response: reqwest::Response) -> CliError {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => {
            let message = body.error_description.unwrap_or_else(|| body.error.clone());
            (Some(body.error), message)
        }
        Err(_) => (None, text),
    };

    match (status, code.as_deref()) {
        (StatusCode::UNAUTHORIZED, Some("unauthorized")) => CliError::NotLoggedIn,
        (_, Some("not_configured")) => CliError::NotConfigured(message),
        (StatusCode::NOT_FOUND, _) => CliError::NotFound(message),
        (StatusCode::BAD_REQUEST, Some("validation_error")) => CliError::Validation(message),
        _ => CliError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
