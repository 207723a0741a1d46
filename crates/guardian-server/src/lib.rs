//! # guardian-server
//!
//! HTTP console API for the Keycloak Guardian console.
//!
//! The server holds the console's state for its lifetime: the user records,
//! the authentication flag and the identity-provider configuration. It
//! exposes:
//! - Login redirect, return handling and logout
//! - User record management (list, search, create, edit, delete)
//! - Identity-provider settings and connectivity testing
//! - Health check endpoints
//!
//! ## Usage
//!
//! ```ignore
//! use guardian_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let server = Server::new(config).await?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod events;
pub mod router;
pub mod settings;
pub mod state;
pub mod users;

pub use config::ServerConfig;
pub use error::{ConsoleError, ConsoleResult};
pub use events::{ConsoleEventLogger, InMemoryEventLogger, TracingEventLogger};
pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use guardian_core::IdpConfig;
use guardian_storage::{FileConfigStore, InMemoryUserProvider};
use tokio::net::TcpListener;

/// The Guardian console server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// Restores the identity-provider configuration from the configuration
    /// file, falling back to the environment.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let state = AppState::new(
            config.clone(),
            Arc::new(InMemoryUserProvider::new()),
            Arc::new(FileConfigStore::new(&config.config_file)),
            Arc::new(TracingEventLogger::new()),
        )?;
        state.restore_idp_config(IdpConfig::from_env()).await?;

        tracing::info!(
            config_file = %config.config_file.display(),
            "console state initialized"
        );

        Ok(Self { config, state })
    }

    /// Creates a server around an existing state.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.clone(),
            state,
        }
    }

    /// Runs the server.
    ///
    /// This starts the HTTP server and blocks until it receives a shutdown signal.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on http://{}", addr);

        self.serve(listener).await
    }

    /// Serves on an already bound listener until a shutdown signal arrives.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let app = create_router(self.state);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates a test router without starting the server.
    pub fn test_router(&self) -> Router {
        create_router(self.state.clone())
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
