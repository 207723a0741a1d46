//! Application state management.
//!
//! A single [`AppState`] is created at startup and shared by every handler.
//! It owns the user records, the authentication state and the cached
//! identity-provider configuration for the lifetime of the server.

use std::sync::Arc;

use chrono::Utc;
use guardian_core::{Event, IdpConfig};
use guardian_model::seed_users;
use guardian_oidc::{AuthState, CallbackParams, ConnectivityProbe, OidcEndpoints};
use guardian_storage::{ConfigStore, UserProvider};
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::events::ConsoleEventLogger;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,

    /// User record storage.
    pub users: Arc<dyn UserProvider>,

    /// Identity-provider configuration persistence.
    pub config_store: Arc<dyn ConfigStore>,

    /// Audit event destination.
    pub events: Arc<dyn ConsoleEventLogger>,

    /// Identity-provider connectivity probe.
    pub probe: ConnectivityProbe,

    auth: Arc<RwLock<AuthState>>,
    idp: Arc<RwLock<Option<IdpConfig>>>,
}

impl AppState {
    /// Creates a new application state.
    ///
    /// The identity-provider configuration starts empty; call
    /// [`restore_idp_config`](Self::restore_idp_config) to load it.
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserProvider>,
        config_store: Arc<dyn ConfigStore>,
        events: Arc<dyn ConsoleEventLogger>,
    ) -> ConsoleResult<Self> {
        let probe = ConnectivityProbe::new(config.probe_timeout)?;
        Ok(Self {
            config,
            users,
            config_store,
            events,
            probe,
            auth: Arc::new(RwLock::new(AuthState::default())),
            idp: Arc::new(RwLock::new(None)),
        })
    }

    /// Loads the saved configuration, falling back to `env_config`.
    ///
    /// A saved document takes precedence over the environment.
    pub async fn restore_idp_config(&self, env_config: Option<IdpConfig>) -> ConsoleResult<()> {
        let restored = match self.config_store.load().await? {
            Some(saved) => {
                tracing::info!("loaded saved identity provider configuration");
                Some(saved)
            }
            None => {
                if env_config.is_some() {
                    tracing::info!("using identity provider configuration from environment");
                }
                env_config
            }
        };

        if let Some(config) = &restored {
            if !config.is_complete() {
                tracing::warn!(
                    missing = %config.missing_fields().join(", "),
                    "identity provider configuration is incomplete"
                );
            }
        }

        *self.idp.write().await = restored;
        Ok(())
    }

    /// Returns the active identity-provider configuration, if any.
    pub async fn idp_config(&self) -> Option<IdpConfig> {
        self.idp.read().await.clone()
    }

    /// Persists a configuration and makes it active.
    pub async fn save_idp_config(&self, config: IdpConfig) -> ConsoleResult<()> {
        self.config_store.save(&config).await?;
        *self.idp.write().await = Some(config);
        Ok(())
    }

    /// Resolves the OIDC endpoints of the active configuration.
    pub async fn endpoints(&self) -> ConsoleResult<OidcEndpoints> {
        let config = self.idp_config().await.unwrap_or_default();
        Ok(OidcEndpoints::from_config(&config)?)
    }

    /// Returns the current authentication state.
    pub async fn auth_state(&self) -> AuthState {
        *self.auth.read().await
    }

    /// Fails with `Unauthorized` unless an operator is logged in.
    pub async fn require_authenticated(&self) -> ConsoleResult<AuthState> {
        let state = self.auth_state().await;
        if state.is_authenticated() {
            Ok(state)
        } else {
            Err(ConsoleError::Unauthorized)
        }
    }

    /// Performs a local login.
    pub async fn login_local(&self) -> ConsoleResult<AuthState> {
        let mut auth = self.auth.write().await;
        let next = auth.login_local(Utc::now());
        self.enter(*auth, next).await?;
        *auth = next;
        Ok(next)
    }

    /// Applies the parameters of a return from the identity provider.
    pub async fn complete_redirect(&self, params: &CallbackParams) -> ConsoleResult<AuthState> {
        let mut auth = self.auth.write().await;
        let next = auth.complete_redirect(params, Utc::now());
        self.enter(*auth, next).await?;
        *auth = next;
        Ok(next)
    }

    /// Logs out and clears the user records.
    pub async fn logout(&self) -> ConsoleResult<AuthState> {
        let mut auth = self.auth.write().await;
        let next = auth.logout();
        self.users.clear().await?;
        *auth = next;
        Ok(next)
    }

    /// Records an audit event. Logging failures are reported, never returned.
    pub async fn record(&self, event: Event) {
        if let Err(e) = self.events.log(event).await {
            tracing::warn!(error = %e, "failed to log console event");
        }
    }

    /// Loads the seed records when a login starts a new session.
    async fn enter(&self, current: AuthState, next: AuthState) -> ConsoleResult<()> {
        if !current.is_authenticated() && next.is_authenticated() {
            self.users.replace_all(seed_users(Utc::now())).await?;
            tracing::debug!("user records loaded");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use guardian_storage::{InMemoryConfigStore, InMemoryUserProvider, UserSearchCriteria};

    use super::*;
    use crate::events::InMemoryEventLogger;

    fn state_with(store: InMemoryConfigStore) -> AppState {
        AppState::new(
            ServerConfig::for_testing("unused.json"),
            Arc::new(InMemoryUserProvider::new()),
            Arc::new(store),
            Arc::new(InMemoryEventLogger::new()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn saved_config_takes_precedence_over_env() {
        let saved = IdpConfig::new("http://saved", "r", "c");
        let state = state_with(InMemoryConfigStore::with_config(saved.clone()));

        state
            .restore_idp_config(Some(IdpConfig::new("http://env", "r", "c")))
            .await
            .unwrap();

        assert_eq!(state.idp_config().await, Some(saved));
    }

    #[tokio::test]
    async fn env_config_used_when_nothing_saved() {
        let state = state_with(InMemoryConfigStore::new());
        let env = IdpConfig::new("http://env", "r", "c");

        state.restore_idp_config(Some(env.clone())).await.unwrap();
        assert_eq!(state.idp_config().await, Some(env));
    }

    #[tokio::test]
    async fn endpoints_require_configuration() {
        let state = state_with(InMemoryConfigStore::new());
        state.restore_idp_config(None).await.unwrap();

        let err = state.endpoints().await.unwrap_err();
        assert!(matches!(err, ConsoleError::NotConfigured { ref missing } if missing.len() == 3));
    }

    #[tokio::test]
    async fn login_loads_seed_and_logout_clears() {
        let state = state_with(InMemoryConfigStore::new());
        assert!(state.require_authenticated().await.is_err());

        state.login_local().await.unwrap();
        assert_eq!(state.users.count(&UserSearchCriteria::new()).await.unwrap(), 3);

        state.logout().await.unwrap();
        assert!(!state.auth_state().await.is_authenticated());
        assert_eq!(state.users.count(&UserSearchCriteria::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repeated_login_keeps_records() {
        let state = state_with(InMemoryConfigStore::new());
        state.login_local().await.unwrap();
        state.users.delete("1").await.unwrap();

        state.login_local().await.unwrap();
        assert_eq!(state.users.count(&UserSearchCriteria::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn redirect_without_code_stays_unauthenticated() {
        let state = state_with(InMemoryConfigStore::new());
        let next = state
            .complete_redirect(&CallbackParams::from_query("error=access_denied"))
            .await
            .unwrap();
        assert!(!next.is_authenticated());
    }
}
