//! Router configuration.
//!
//! This module creates the main Axum router that combines all endpoints.

use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, settings, users};

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check));

    let session_routes = Router::new()
        .route("/", get(auth::root))
        .route("/login", get(auth::login))
        .route("/login/local", post(auth::login_local))
        .route("/logout", post(auth::logout))
        .route("/api/session", get(auth::session));

    let user_routes = Router::new()
        .route("/api/dashboard", get(users::dashboard))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let settings_routes = Router::new()
        .route(
            "/api/config",
            get(settings::get_config).put(settings::put_config),
        )
        .route("/api/config/test", post(settings::test_config));

    Router::new()
        .merge(session_routes)
        .merge(user_routes)
        .merge(settings_routes)
        .with_state(state)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origin = if state.config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            state
                .config
                .cors_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the server answers.
    pub status: String,
    /// Server version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// Liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use guardian_core::IdpConfig;
    use guardian_storage::{InMemoryConfigStore, InMemoryUserProvider};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ServerConfig;
    use crate::events::InMemoryEventLogger;

    async fn app_with(idp: Option<IdpConfig>) -> (Router, AppState) {
        let store = match idp {
            Some(config) => InMemoryConfigStore::with_config(config),
            None => InMemoryConfigStore::new(),
        };
        let state = AppState::new(
            ServerConfig::for_testing("unused.json").with_base_url("http://app"),
            Arc::new(InMemoryUserProvider::new()),
            Arc::new(store),
            Arc::new(InMemoryEventLogger::new()),
        )
        .unwrap();
        state.restore_idp_config(None).await.unwrap();
        (create_router(state.clone()), state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await;
        assert_eq!(response.0.status, "healthy");
    }

    #[tokio::test]
    async fn users_require_login() {
        let (app, _) = app_with(None).await;

        let (status, body) = send(&app, Method::GET, "/api/users", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");

        let (status, _) = send(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_without_config_is_unavailable() {
        let (app, _) = app_with(None).await;

        let (status, body) = send(&app, Method::GET, "/login", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "not_configured");
    }

    #[tokio::test]
    async fn login_redirects_to_authorization_endpoint() {
        let (app, _) = app_with(Some(IdpConfig::new("http://x", "r", "c"))).await;

        let response = app
            .oneshot(Request::get("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://x/realms/r/protocol/openid-connect/auth?client_id=c&redirect_uri=http%3A%2F%2Fapp&response_type=code&scope=openid"
        );
    }

    #[tokio::test]
    async fn callback_code_authenticates_and_strips_url() {
        let (app, state) = app_with(Some(IdpConfig::new("http://x", "r", "c"))).await;

        let response = app
            .clone()
            .oneshot(
                Request::get("/?code=abc&session_state=s&tab=users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/?tab=users");
        assert!(state.auth_state().await.is_authenticated());

        let (status, body) = send(&app, Method::GET, "/api/users?search=JOAO", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["username"], "joao.silva");
    }

    #[tokio::test]
    async fn callback_error_is_rejected() {
        let (app, state) = app_with(None).await;

        let (status, body) = send(&app, Method::GET, "/?error=access_denied", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "login_rejected");
        assert!(!state.auth_state().await.is_authenticated());
    }

    #[tokio::test]
    async fn user_crud_flow() {
        let (app, _) = app_with(None).await;
        send(&app, Method::POST, "/login/local", None).await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({"username": "carla", "email": "carla@empresa.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["enabled"], true);
        let id = created["id"].as_str().unwrap().to_string();

        let (_, list) = send(&app, Method::GET, "/api/users", None).await;
        assert_eq!(list.as_array().unwrap().len(), 4);

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/api/users/{id}"),
            Some(json!({"username": "carla", "enabled": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["enabled"], false);
        assert_eq!(updated["createdTimestamp"], created["createdTimestamp"]);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::DELETE, &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let (app, _) = app_with(None).await;
        send(&app, Method::POST, "/login/local", None).await;

        let (status, body) =
            send(&app, Method::POST, "/api/users", Some(json!({"username": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn missing_username_uses_error_body() {
        let (app, _) = app_with(None).await;
        send(&app, Method::POST, "/login/local", None).await;

        let (status, body) =
            send(&app, Method::POST, "/api/users", Some(json!({"email": "x@y"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert!(body["error_description"]
            .as_str()
            .unwrap()
            .contains("username"));

        let (status, body) =
            send(&app, Method::PUT, "/api/users/1", Some(json!({"enabled": "yes"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn malformed_config_uses_error_body() {
        let (app, state) = app_with(None).await;

        let request = Request::put("/api/config")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"serverUrl\": "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "validation_error");
        assert!(state.idp_config().await.is_none());
    }

    #[tokio::test]
    async fn config_round_trip_masks_password() {
        let (app, state) = app_with(None).await;

        let (status, saved) = send(
            &app,
            Method::PUT,
            "/api/config",
            Some(json!({
                "serverUrl": "http://x",
                "realm": "r",
                "clientId": "c",
                "adminUsername": "admin",
                "adminPassword": "s3cret"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["adminPassword"], "****");
        assert_eq!(saved["configured"], true);

        // Sending the mask back keeps the stored password.
        let mut resend = saved.clone();
        resend["realm"] = json!("r2");
        send(&app, Method::PUT, "/api/config", Some(resend)).await;

        let stored = state.idp_config().await.unwrap();
        assert_eq!(stored.realm, "r2");
        assert_eq!(stored.admin_password, "s3cret");
    }

    #[tokio::test]
    async fn logout_returns_end_session_url() {
        let (app, state) = app_with(Some(IdpConfig::new("http://x", "r", "c"))).await;
        send(&app, Method::POST, "/login/local", None).await;

        let (status, body) = send(&app, Method::POST, "/logout", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["logoutUrl"],
            "http://x/realms/r/protocol/openid-connect/logout?client_id=c&post_logout_redirect_uri=http%3A%2F%2Fapp"
        );
        assert!(!state.auth_state().await.is_authenticated());
    }

    #[tokio::test]
    async fn connectivity_test_without_config_is_unavailable() {
        let (app, _) = app_with(None).await;
        let (status, body) = send(&app, Method::POST, "/api/config/test", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "not_configured");
    }
}
