//! Login and bearer token integration tests.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::common::TestEnv;

/// Error response.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

/// Auth status response.
#[derive(Debug, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
}

/// Full round trip: login, use the key, watch it lapse.
#[tokio::test]
async fn test_login_then_key_expires() -> anyhow::Result<()> {
    let env = TestEnv::with_config(|config| config.key_ttl_secs = 1).await?;

    let key = env.login().await?;
    assert_eq!(key.len(), 16, "default key is 8 bytes of hex");

    let status: AuthStatus = env
        .client
        .get(env.url("/auth/status"))
        .bearer_auth(&key)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert!(status.authenticated);

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let response = env
        .client
        .get(env.url("/auth/status"))
        .bearer_auth(&key)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Text login answers with the bare key and an Expires header.
#[tokio::test]
async fn test_text_login() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .post(env.url("/auth"))
        .header("Content-Type", "text/plain")
        .body(env.current_code()?)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("expires"));

    let key = response.text().await?;
    assert!(key.bytes().all(|b| b.is_ascii_hexdigit()));

    let response = env.client.get(env.url("/")).bearer_auth(&key).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_wrong_code_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .post(env.url("/auth"))
        .json(&serde_json::json!({ "otp_token": "1234567" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error: ErrorResponse = response.json().await?;
    assert_eq!(error.error, "invalid_otp");
    assert!(error.error_description.is_some());

    Ok(())
}

#[tokio::test]
async fn test_bogus_bearer_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.client.get(env.url("/")).bearer_auth("bogus").send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["www-authenticate"], "Bearer");

    let response = env
        .client
        .get(env.url("/"))
        .header("Authorization", "garbage")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_every_login_gets_its_own_key() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let first = env.login().await?;
    let second = env.login().await?;
    assert_ne!(first, second);

    for key in [&first, &second] {
        let response = env.client.get(env.url("/")).bearer_auth(key).send().await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    Ok(())
}

#[tokio::test]
async fn test_revoking_keys() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.client.delete(env.url("/auth/keys")).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let key = env.login().await?;
    let response = env
        .client
        .delete(env.url("/auth/keys"))
        .bearer_auth(&key)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = env.client.get(env.url("/")).bearer_auth(&key).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
