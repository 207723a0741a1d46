//! Identity-provider settings handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
};
use guardian_core::{config::MASKED_SECRET, EventType, IdpConfig};
use guardian_oidc::ConnectionReport;

use crate::dto::ConfigResponse;
use crate::error::{ConsoleError, ConsoleResult};
use crate::events::console_event;
use crate::state::AppState;

/// GET /api/config - Active configuration with the password masked.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = state.idp_config().await;
    Json(ConfigResponse::new(config.as_ref()))
}

/// PUT /api/config - Save and activate a configuration.
///
/// A password equal to the mask keeps the stored password, so a value read
/// from `GET /api/config` can be sent back unchanged.
pub async fn put_config(
    State(state): State<AppState>,
    payload: Result<Json<IdpConfig>, JsonRejection>,
) -> ConsoleResult<Json<ConfigResponse>> {
    let Json(mut config) = payload?;
    if config.admin_password == MASKED_SECRET {
        config.admin_password = state
            .idp_config()
            .await
            .map(|c| c.admin_password)
            .unwrap_or_default();
    }

    state.save_idp_config(config.clone()).await?;
    state
        .record(
            console_event(EventType::ConfigSaved, Some(&config))
                .detail("server_url", config.server_base())
                .success()
                .build(),
        )
        .await;

    if !config.is_complete() {
        tracing::warn!(
            missing = %config.missing_fields().join(", "),
            "saved identity provider configuration is incomplete"
        );
    }

    Ok(Json(ConfigResponse::new(Some(&config))))
}

/// POST /api/config/test - Probe the identity provider.
///
/// Tests the configuration in the request body when one is given, otherwise
/// the active configuration. Nothing is saved.
pub async fn test_config(
    State(state): State<AppState>,
    body: Bytes,
) -> ConsoleResult<Json<ConnectionReport>> {
    let config = if body.iter().all(u8::is_ascii_whitespace) {
        state.idp_config().await.unwrap_or_default()
    } else {
        serde_json::from_slice::<IdpConfig>(&body)
            .map_err(|e| ConsoleError::Validation(e.to_string()))?
    };

    let (result, report) = state.probe.report(&config).await;

    let event = console_event(EventType::ConnectionTested, Some(&config))
        .detail("elapsed_ms", report.elapsed_ms.to_string());
    let event = match &result {
        Ok(_) => event.success(),
        Err(e) => event.failure(e.to_string()),
    };
    state.record(event.build()).await;

    match result {
        Ok(_) => {
            tracing::info!(elapsed_ms = report.elapsed_ms, "identity provider reachable");
            Ok(Json(report))
        }
        Err(e) => Err(e.into()),
    }
}
