//! Session and user-record flows over HTTP.

use guardian_core::EventType;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::common::{idp_config, location, TestEnv};

/// Tests health endpoints.
#[tokio::test]
async fn test_health_endpoints() -> anyhow::Result<()> {
    let env = TestEnv::new(None).await?;

    let health = env.get("/health").await?;
    assert!(health.status().is_success(), "Health endpoint should return success");
    let body: Value = health.json().await?;
    assert_eq!(body["status"], "healthy");

    let live = env.get("/health/live").await?;
    assert!(live.status().is_success(), "Liveness probe should return success");

    Ok(())
}

/// Records are hidden until the operator logs in.
#[tokio::test]
async fn test_records_require_login() -> anyhow::Result<()> {
    let env = TestEnv::new(None).await?;

    let response = env.get("/api/users").await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let session: Value = env.get("/api/session").await?.json().await?;
    assert_eq!(session["authenticated"], false);
    assert_eq!(session["configured"], false);

    Ok(())
}

/// Full redirect round trip: login redirect, returning code, logout.
#[tokio::test]
async fn test_redirect_login_round_trip() -> anyhow::Result<()> {
    let env = TestEnv::new(Some(idp_config("http://sso.local"))).await?;

    let login = env.get("/login").await?;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    let target = location(&login);
    assert!(target.starts_with("http://sso.local/realms/guardian/protocol/openid-connect/auth?"));
    assert!(target.contains("client_id=guardian-console"));
    assert!(target.contains("response_type=code"));
    assert!(target.contains(&format!(
        "redirect_uri={}",
        urlencode(&env.base_url)
    )));

    // The provider sends the browser back with a code.
    let callback = env.get("/?code=abc123&session_state=xyz").await?;
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "/");

    let session: Value = env.get("/api/session").await?.json().await?;
    assert_eq!(session["authenticated"], true);
    assert_eq!(session["method"], "redirect");

    let users: Value = env.get("/api/users").await?.json().await?;
    assert_eq!(users.as_array().map(Vec::len), Some(3));

    let logout: Value = env.post("/logout", None).await?.json().await?;
    assert_eq!(logout["authenticated"], false);
    assert!(logout["logoutUrl"]
        .as_str()
        .unwrap_or_default()
        .starts_with("http://sso.local/realms/guardian/protocol/openid-connect/logout?"));

    let after = env.get("/api/users").await?;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);

    let logins = env.events.events_of(EventType::Login);
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].detail("method"), Some("redirect"));
    assert_eq!(env.events.events_of(EventType::LoginRedirect).len(), 1);
    assert_eq!(env.events.events_of(EventType::Logout).len(), 1);

    Ok(())
}

/// An error returned by the provider leaves the console logged out.
#[tokio::test]
async fn test_provider_error_does_not_authenticate() -> anyhow::Result<()> {
    let env = TestEnv::new(Some(idp_config("http://sso.local"))).await?;

    let response = env
        .get("/?error=access_denied&error_description=User%20cancelled")
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "login_rejected");

    assert!(!env.state.auth_state().await.is_authenticated());
    assert_eq!(env.events.events_of(EventType::LoginError).len(), 1);

    Ok(())
}

/// Create, search, edit and delete a record.
#[tokio::test]
async fn test_user_management() -> anyhow::Result<()> {
    let env = TestEnv::new(None).await?;
    env.login_local().await?;

    let summary: Value = env.get("/api/dashboard").await?.json().await?;
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["inactive"], 1);

    let created = env
        .post(
            "/api/users",
            Some(&json!({
                "username": "ana.costa",
                "email": "ana@empresa.com",
                "firstName": "Ana",
                "lastName": "Costa"
            })),
        )
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = created.json().await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());

    // Search is case-insensitive over username, email and names.
    let found: Value = env.get("/api/users?search=COSTA").await?.json().await?;
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(found[0]["id"], created["id"]);

    let updated = env
        .put(
            &format!("/api/users/{id}"),
            &json!({
                "username": "ana.costa",
                "email": "ana.costa@empresa.com",
                "firstName": "Ana",
                "lastName": "Costa",
                "enabled": false
            }),
        )
        .await?;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Value = updated.json().await?;
    assert_eq!(updated["email"], "ana.costa@empresa.com");
    assert_eq!(updated["createdTimestamp"], created["createdTimestamp"]);

    let summary: Value = env.get("/api/dashboard").await?.json().await?;
    assert_eq!(summary["total"], 4);
    assert_eq!(summary["inactive"], 2);

    let deleted = env.delete(&format!("/api/users/{id}")).await?;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = env.get(&format!("/api/users/{id}")).await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    assert_eq!(env.events.events_of(EventType::UserCreated).len(), 1);
    assert_eq!(env.events.events_of(EventType::UserUpdated).len(), 1);
    assert_eq!(env.events.events_of(EventType::UserDeleted).len(), 1);

    Ok(())
}

fn urlencode(value: &str) -> String {
    value.replace(':', "%3A").replace('/', "%2F")
}
