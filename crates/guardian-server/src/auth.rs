//! Login, logout and session handlers.
//!
//! The console only performs the front half of the authorization-code flow.
//! `/login` redirects to the identity provider, which sends the browser back
//! to the console origin with `?code=...`. The root handler notices the code,
//! flips the session to authenticated and redirects to the same URL without
//! the callback parameters. The code is never exchanged.

use axum::{
    Json,
    extract::{RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use guardian_core::EventType;
use guardian_oidc::{strip_callback_query, CallbackOutcome, CallbackParams};

use crate::dto::{ConsoleInfo, LogoutResponse, SessionResponse};
use crate::error::{ConsoleError, ConsoleResult};
use crate::events::console_event;
use crate::state::AppState;

/// GET / - Console info, or the return from the identity provider.
pub async fn root(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ConsoleResult<Response> {
    let query = query.unwrap_or_default();
    let params = CallbackParams::from_query(&query);
    let idp = state.idp_config().await;

    match params.outcome() {
        CallbackOutcome::Code => {
            tracing::debug!("authorization code received");
            state.complete_redirect(&params).await?;
            state
                .record(
                    console_event(EventType::Login, idp.as_ref())
                        .detail("method", "redirect")
                        .success()
                        .build(),
                )
                .await;

            let target = match strip_callback_query(&query) {
                Some(rest) => format!("/?{rest}"),
                None => "/".to_string(),
            };
            Ok(Redirect::to(&target).into_response())
        }
        CallbackOutcome::Error { error, description } => {
            tracing::warn!(%error, "identity provider rejected the login");
            state
                .record(
                    console_event(EventType::LoginError, idp.as_ref())
                        .failure(error.clone())
                        .build(),
                )
                .await;
            Err(ConsoleError::LoginRejected { error, description })
        }
        CallbackOutcome::None => {
            let auth = state.auth_state().await;
            Ok(Json(ConsoleInfo {
                name: "Keycloak Guardian".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                authenticated: auth.is_authenticated(),
                configured: idp.as_ref().is_some_and(guardian_core::IdpConfig::is_complete),
            })
            .into_response())
        }
    }
}

/// GET /login - Redirect to the identity provider's authorization endpoint.
pub async fn login(State(state): State<AppState>) -> ConsoleResult<Redirect> {
    let endpoints = state.endpoints().await?;
    let url = endpoints.authorization_url(state.config.origin());

    let idp = state.idp_config().await;
    state
        .record(
            console_event(EventType::LoginRedirect, idp.as_ref())
                .detail("redirect_uri", state.config.origin())
                .success()
                .build(),
        )
        .await;

    tracing::info!(realm_base = %endpoints.realm_base(), "redirecting to identity provider");
    Ok(Redirect::to(&url))
}

/// POST /login/local - Mock login without the identity provider.
pub async fn login_local(State(state): State<AppState>) -> ConsoleResult<Json<SessionResponse>> {
    let auth = state.login_local().await?;
    let idp = state.idp_config().await;

    state
        .record(
            console_event(EventType::Login, idp.as_ref())
                .detail("method", "local")
                .success()
                .build(),
        )
        .await;

    tracing::info!("operator logged in locally");
    Ok(Json(SessionResponse::new(
        auth,
        idp.as_ref().is_some_and(guardian_core::IdpConfig::is_complete),
    )))
}

/// POST /logout - End the session and clear the user records.
///
/// Returns the identity provider's end-session URL when configured, so the
/// caller can finish the logout there.
pub async fn logout(State(state): State<AppState>) -> ConsoleResult<Json<LogoutResponse>> {
    state.logout().await?;

    let logout_url = state
        .endpoints()
        .await
        .ok()
        .map(|e| e.logout_url(state.config.origin()));

    let idp = state.idp_config().await;
    state
        .record(console_event(EventType::Logout, idp.as_ref()).success().build())
        .await;

    tracing::info!("operator logged out");
    Ok(Json(LogoutResponse {
        authenticated: false,
        logout_url,
    }))
}

/// GET /api/session - Current authentication state.
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    let auth = state.auth_state().await;
    let configured = state
        .idp_config()
        .await
        .is_some_and(|c| c.is_complete());
    Json(SessionResponse::new(auth, configured))
}
