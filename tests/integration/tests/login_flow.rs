//! Agent login flow integration tests.

use serde_json::json;
use sso_directory::UserDirectory;

use crate::common::TestEnv;

/// A first callback provisions the agent; a second one reuses it.
#[tokio::test]
async fn test_callback_provisions_agent_once() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_keycloak(json!({
        "sub": "f3a1",
        "email": "new@b.com",
        "given_name": "Grace",
        "family_name": "Hopper"
    }))
    .await;

    let (status, location) = env.get(&env.callback_url("code-1")).await?;
    assert_eq!(status, 302);
    assert_eq!(location.as_deref(), Some("/agent/overview"));

    let user = env
        .directory
        .find_by_email("new@b.com")
        .await?
        .expect("agent should be provisioned");
    assert!(user.is_agent);
    assert_eq!(user.first_name, "Grace");
    assert_eq!(user.last_name, "Hopper");
    assert_eq!(user.locale.as_deref(), Some("en_US"));
    assert!(env
        .directory
        .hasher()
        .verify("547e3dd7-b797-53b3-910e-b070406a5ecb", &user.password_hash));

    let (status, _) = env.get(&env.callback_url("code-2")).await?;
    assert_eq!(status, 302);
    assert_eq!(env.directory.len(), 1);

    Ok(())
}

/// A rejected code sends the agent back to the login page.
#[tokio::test]
async fn test_provider_rejection_redirects_to_login() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_rejecting_token_endpoint().await;

    let (status, location) = env.get(&env.callback_url("stale")).await?;
    assert_eq!(status, 302);
    assert_eq!(
        location.as_deref(),
        Some("/agent/login?error=authentication_failed")
    );
    assert!(env.directory.is_empty());

    // The login page reports the failure instead of bouncing to Keycloak
    let (status, location) = env
        .get(&env.url("/agent/login?error=authentication_failed"))
        .await?;
    assert_eq!(status, 401);
    assert!(location.is_none());

    Ok(())
}

/// A remote identity without email is rejected without creating a user.
#[tokio::test]
async fn test_identity_without_email_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_keycloak(json!({"sub": "f3a1", "email": null})).await;

    let (status, location) = env.get(&env.callback_url("code-1")).await?;
    assert_eq!(status, 302);
    assert_eq!(
        location.as_deref(),
        Some("/agent/login?error=authentication_failed")
    );
    assert!(env.directory.is_empty());

    Ok(())
}

/// A callback missing `session_state` restarts the login without
/// contacting Keycloak.
#[tokio::test]
async fn test_incomplete_callback_restarts_login() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let (status, location) = env
        .get(&env.url("/agent/login_check?code=abc&state=st-1"))
        .await?;
    assert_eq!(status, 307);
    assert_eq!(location.as_deref(), Some("/agent/login"));
    assert_eq!(env.keycloak_requests().await, 0);

    Ok(())
}

/// A repeated callback parameter is accepted and its last value is used.
#[tokio::test]
async fn test_repeated_code_uses_last_value() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_keycloak(json!({ "sub": "f3a2", "email": "dup@b.com" })).await;

    let (status, location) = env
        .get(&env.url(
            "/agent/login_check?code=first&code=second&state=st-1&session_state=ss-1",
        ))
        .await?;
    assert_eq!(status, 302);
    assert_eq!(location.as_deref(), Some("/agent/overview"));

    let bodies = env.token_request_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("code=second"));
    assert!(!bodies[0].contains("code=first"));

    Ok(())
}

/// The login page redirects to the realm's authorization endpoint.
#[tokio::test]
async fn test_login_redirects_to_keycloak() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let (status, location) = env.get(&env.url("/agent/login")).await?;
    assert_eq!(status, 302);

    let location = location.expect("login should redirect");
    let expected_prefix = format!(
        "{}/realms/agents/protocol/openid-connect/auth?",
        env.keycloak.uri()
    );
    assert!(location.starts_with(&expected_prefix), "{location}");
    assert!(location.contains("response_type=code"));
    assert!(location.contains("client_id=agent-backoffice"));

    Ok(())
}

/// The health endpoint reports the running version.
#[tokio::test]
async fn test_health_endpoint() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let body: serde_json::Value = env
        .client
        .get(env.url("/health"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}
