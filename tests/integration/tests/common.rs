//! Common test utilities and fixtures.

use std::net::TcpListener;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use folio_auth::{OtpVerifier, TotpConfig};
use folio_server::{Server, ServerConfig};
use reqwest::Client;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// Test environment owning a running server.
pub struct TestEnv {
    /// Holds the secret file.
    _dir: TempDir,
    /// Path of the OTP secret file.
    pub secret_file: PathBuf,
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client for testing.
    pub client: Client,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Starts a server with default test settings.
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(|_| {}).await
    }

    /// Starts a server after letting `customize` adjust the configuration.
    pub async fn with_config<F>(customize: F) -> anyhow::Result<Self>
    where
        F: FnOnce(&mut ServerConfig),
    {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("folio_server=debug,folio_api=debug,folio_auth=debug")
            .with_test_writer()
            .try_init();

        let dir = tempfile::tempdir()?;
        let secret_file = dir.path().join(".otp");

        // Find available port for server
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let server_port = listener.local_addr()?.port();
        drop(listener);

        let base_url = format!("http://127.0.0.1:{server_port}");

        let mut config = ServerConfig::for_testing(&secret_file);
        config.port = server_port;
        customize(&mut config);

        let (_shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = Server::new(config).await?;
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown requested");
            };
            if let Err(e) = server.run_until(shutdown).await {
                tracing::error!("Server error: {e:#}");
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        wait_for_server(&client, &base_url).await?;

        Ok(Self {
            _dir: dir,
            secret_file,
            base_url,
            client,
            _shutdown_tx,
        })
    }

    /// Builds an absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads the secret the server provisioned.
    pub fn secret(&self) -> anyhow::Result<String> {
        Ok(std::fs::read_to_string(&self.secret_file)?.trim().to_string())
    }

    /// The code an authenticator app would show right now.
    pub fn current_code(&self) -> anyhow::Result<String> {
        let secret = self.secret()?;
        Ok(OtpVerifier::generate_at(
            &secret,
            SystemTime::now(),
            &TotpConfig::default(),
        )?)
    }

    /// Logs in with the current code and returns the API key.
    pub async fn login(&self) -> anyhow::Result<String> {
        let response = self
            .client
            .post(self.url("/auth"))
            .json(&serde_json::json!({ "otp_token": self.current_code()? }))
            .send()
            .await?
            .error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        body["api_key"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| anyhow::anyhow!("login response without api_key: {body}"))
    }
}

/// Waits for the server to answer its health probe.
async fn wait_for_server(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let url = format!("{base_url}/health/live");
    for _ in 0..50 {
        if let Ok(response) = client.get(&url).send().await {
            if response.status().is_success() {
                return Ok(());
            }
        }
        sleep(Duration::from_millis(100)).await;
    }
    anyhow::bail!("server did not become ready at {base_url}")
}
