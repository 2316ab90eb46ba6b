//! Infrastructure endpoint integration tests.

use reqwest::StatusCode;

use crate::common::TestEnv;

#[tokio::test]
async fn test_root_is_alive() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.client.get(env.url("/")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "Alive");

    Ok(())
}

#[tokio::test]
async fn test_health_endpoints() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let health: serde_json::Value = env
        .client
        .get(env.url("/health"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(health["status"], "healthy");

    for path in ["/health/live", "/health/ready"] {
        let response = env.client.get(env.url(path)).send().await?;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }

    Ok(())
}

#[tokio::test]
async fn test_secret_is_provisioned_owner_only() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let secret = env.secret()?;
    assert_eq!(secret.len(), 32, "20 bytes of unpadded base32");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&env.secret_file)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    Ok(())
}
