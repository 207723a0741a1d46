//! Identity-provider settings over HTTP.

use guardian_core::{EventType, CONFIG_STORAGE_KEY};
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{idp_config, TestEnv};

/// Saved settings survive a restart and win over the environment.
#[tokio::test]
async fn test_config_persists_across_restart() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("keycloak-config.json");

    let env = TestEnv::with_config_file(&file, None).await?;
    let before: Value = env.get("/api/config").await?.json().await?;
    assert_eq!(before["configured"], false);
    assert_eq!(before["missing"], json!(["serverUrl", "realm", "clientId"]));

    let saved = env
        .put(
            "/api/config",
            &json!({
                "serverUrl": "http://sso.local/",
                "realm": "guardian",
                "clientId": "guardian-console",
                "adminUsername": "admin",
                "adminPassword": "s3cret"
            }),
        )
        .await?;
    assert_eq!(saved.status(), StatusCode::OK);
    let saved: Value = saved.json().await?;
    assert_eq!(saved["adminPassword"], "****");
    assert_eq!(saved["configured"], true);

    let document: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
    assert_eq!(document[CONFIG_STORAGE_KEY]["realm"], "guardian");
    assert_eq!(document[CONFIG_STORAGE_KEY]["adminPassword"], "s3cret");

    // A new console on the same file ignores the environment.
    let restarted =
        TestEnv::with_config_file(&file, Some(idp_config("http://from-env.local"))).await?;
    let restored = restarted.state.idp_config().await;
    assert_eq!(restored.map(|c| c.realm), Some("guardian".to_string()));

    let login = restarted.get("/login").await?;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    assert_eq!(env.events.events_of(EventType::ConfigSaved).len(), 1);

    Ok(())
}

/// Without a saved document the environment values are used.
#[tokio::test]
async fn test_environment_fallback() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("keycloak-config.json");

    let env = TestEnv::with_config_file(&file, Some(idp_config("http://from-env.local"))).await?;
    let config: Value = env.get("/api/config").await?.json().await?;
    assert_eq!(config["serverUrl"], "http://from-env.local");
    assert_eq!(config["configured"], true);

    Ok(())
}

/// Login is unavailable until the required fields are set.
#[tokio::test]
async fn test_login_requires_configuration() -> anyhow::Result<()> {
    let env = TestEnv::new(None).await?;

    let response = env.get("/login").await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "not_configured");

    // Local login still works.
    env.login_local().await?;
    let session: Value = env.get("/api/session").await?.json().await?;
    assert_eq!(session["method"], "local");

    Ok(())
}

/// Connectivity test against a reachable provider.
#[tokio::test]
async fn test_connectivity_success() -> anyhow::Result<()> {
    let provider = MockServer::start().await;
    let issuer = format!("{}/realms/guardian", provider.uri());
    Mock::given(method("GET"))
        .and(path("/realms/guardian/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": issuer,
            "authorization_endpoint": format!("{issuer}/protocol/openid-connect/auth"),
            "end_session_endpoint": format!("{issuer}/protocol/openid-connect/logout")
        })))
        .mount(&provider)
        .await;

    let env = TestEnv::new(Some(idp_config(&provider.uri()))).await?;

    let response = env.post("/api/config/test", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = response.json().await?;
    assert_eq!(report["status"], "success");
    assert_eq!(report["provider"]["issuer"], issuer.as_str());

    let tested = env.events.events_of(EventType::ConnectionTested);
    assert_eq!(tested.len(), 1);
    assert!(tested[0].error.is_none());

    Ok(())
}

/// Unsaved values can be tested before saving them.
#[tokio::test]
async fn test_connectivity_with_unsaved_values() -> anyhow::Result<()> {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/realms/other/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&provider)
        .await;

    let env = TestEnv::new(None).await?;

    let body = json!({
        "serverUrl": provider.uri(),
        "realm": "other",
        "clientId": "guardian-console"
    });
    let response = env.post("/api/config/test", Some(&body)).await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error: Value = response.json().await?;
    assert_eq!(error["error"], "connection_error");

    // Testing never saves.
    assert!(env.state.idp_config().await.is_none());

    Ok(())
}
