//! Common test utilities and fixtures.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use guardian_core::IdpConfig;
use guardian_server::{AppState, InMemoryEventLogger, Server, ServerConfig};
use guardian_storage::{ConfigStore, FileConfigStore, InMemoryConfigStore, InMemoryUserProvider};
use reqwest::{redirect::Policy, Client, Response};
use serde_json::Value;
use tokio::net::TcpListener;

/// A console running on a local port.
pub struct TestEnv {
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client that does not follow redirects.
    pub client: Client,
    /// Shared state of the running server.
    pub state: AppState,
    /// Recorded audit events.
    pub events: Arc<InMemoryEventLogger>,
}

impl TestEnv {
    /// Starts a console whose saved configuration is `saved`.
    pub async fn new(saved: Option<IdpConfig>) -> anyhow::Result<Self> {
        let store = match saved {
            Some(config) => InMemoryConfigStore::with_config(config),
            None => InMemoryConfigStore::new(),
        };
        Self::start(Arc::new(store), None).await
    }

    /// Starts a console persisting its configuration to `path`, with
    /// `env_config` standing in for the environment variables.
    pub async fn with_config_file(
        path: &Path,
        env_config: Option<IdpConfig>,
    ) -> anyhow::Result<Self> {
        Self::start(Arc::new(FileConfigStore::new(path)), env_config).await
    }

    async fn start(
        store: Arc<dyn ConfigStore>,
        env_config: Option<IdpConfig>,
    ) -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("guardian_server=debug")
            .try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let config = ServerConfig::for_testing("unused.json").with_base_url(base_url.clone());
        let events = Arc::new(InMemoryEventLogger::new());
        let state = AppState::new(
            config,
            Arc::new(InMemoryUserProvider::new()),
            store,
            events.clone(),
        )?;
        state.restore_idp_config(env_config).await?;

        let server = Server::with_state(state.clone());
        tokio::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                tracing::error!("Server error: {}", e);
            }
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            base_url,
            client,
            state,
            events,
        })
    }

    /// Builds an absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a GET request.
    pub async fn get(&self, path: &str) -> anyhow::Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Sends a POST request with an optional JSON body.
    pub async fn post(&self, path: &str, body: Option<&Value>) -> anyhow::Result<Response> {
        let request = self.client.post(self.url(path));
        let request = match body {
            Some(json) => request.json(json),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> anyhow::Result<Response> {
        Ok(self.client.put(self.url(path)).json(body).send().await?)
    }

    /// Sends a DELETE request.
    pub async fn delete(&self, path: &str) -> anyhow::Result<Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }

    /// Logs in without the identity provider.
    pub async fn login_local(&self) -> anyhow::Result<()> {
        let response = self.post("/login/local", None).await?;
        anyhow::ensure!(response.status().is_success(), "local login failed");
        Ok(())
    }
}

/// Location header of a redirect response.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Configuration pointing at `server_url`.
pub fn idp_config(server_url: &str) -> IdpConfig {
    IdpConfig::new(server_url, "guardian", "guardian-console")
}
