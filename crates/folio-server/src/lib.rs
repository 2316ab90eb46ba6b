//! # folio-server
//!
//! Axum server for the folio site backend.
//!
//! Wires the auth core together: picks the secret backend, provisions the
//! OTP secret on first start, starts the key cache janitor and serves the
//! router on TCP and, optionally, a Unix domain socket.
//!
//! ## Usage
//!
//! ```ignore
//! use folio_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::load()?;
//! let server = Server::new(config).await?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod router;
pub mod state;

pub use config::{SecretBackend, ServerConfig};
pub use router::create_router;
pub use state::AppState;

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle, JoinSet};

use folio_api::AuthState;
use folio_auth::{InitOutcome, KeyIssuer, OtpLogin, SecretStore, TotpConfig};
use folio_cache::{spawn_janitor, InMemoryKeyCache};
use folio_storage::{FileSecretProvider, SecretProvider};
use folio_storage_sql::{create_pool, run_migrations, PgSecretProvider};

/// The folio server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
    janitor: JoinHandle<()>,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// Opens the configured secret backend and provisions the OTP secret if
    /// none exists yet. Storage failures here are fatal.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let provider: Arc<dyn SecretProvider> = match config.secret_backend {
            SecretBackend::File => {
                tracing::info!(path = %config.secret_file.display(), "using file secret store");
                Arc::new(FileSecretProvider::new(&config.secret_file))
            }
            SecretBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("the postgres secret backend requires DATABASE_URL")?;
                let pool =
                    create_pool(url, config.db_min_connections, config.db_max_connections)
                        .await?;
                run_migrations(&pool).await?;
                tracing::info!("Database connection pool created");

                Arc::new(PgSecretProvider::new(pool))
            }
        };

        Self::with_secret_provider(config, provider).await
    }

    /// Creates a server over an already constructed secret provider.
    pub async fn with_secret_provider(
        config: ServerConfig,
        provider: Arc<dyn SecretProvider>,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        let totp = TotpConfig::default().skew(config.otp_skew);
        let store = SecretStore::new(provider, config.app_name.clone(), totp);

        match store
            .initialize()
            .await
            .context("cannot initialize OTP secret")?
        {
            InitOutcome::Generated => tracing::info!("OTP secret provisioned"),
            InitOutcome::Existing => tracing::info!("OTP secret loaded"),
        }

        let cache = Arc::new(InMemoryKeyCache::new(config.key_ttl()));
        let janitor = spawn_janitor(&cache, config.janitor_interval());

        let login = OtpLogin::new(store, KeyIssuer::new(cache, config.key_bytes));
        let state = AppState::new(config.clone(), AuthState::new(login));

        Ok(Self {
            config,
            state,
            janitor,
        })
    }

    /// Runs the server until a shutdown signal arrives.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Runs the server until `shutdown` completes or a listener fails.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let app = create_router(self.state.clone());
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut listeners = JoinSet::new();

        if self.config.tcp {
            let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))
                .await
                .with_context(|| {
                    format!("cannot listen on {}:{}", self.config.host, self.config.port)
                })?;
            tracing::info!("Server listening on http://{}", listener.local_addr()?);

            let app = app.clone();
            let stop = wait_for_stop(stop_rx.clone());
            listeners.spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(stop)
                    .await
                    .context("TCP listener failed")
            });
        }

        #[cfg(unix)]
        let _socket = match &self.config.unix_socket {
            Some(path) => {
                let (listener, socket) = unix::bind(path)?;
                tracing::info!(path = %path.display(), "Server listening on unix socket");

                let stop = wait_for_stop(stop_rx.clone());
                listeners.spawn(async move {
                    axum::serve(listener, app)
                        .with_graceful_shutdown(stop)
                        .await
                        .context("unix socket listener failed")
                });
                Some(socket)
            }
            None => None,
        };

        #[cfg(not(unix))]
        if self.config.unix_socket.is_some() {
            anyhow::bail!("unix sockets are not supported on this platform");
        }

        let first = tokio::select! {
            () = shutdown => None,
            Some(joined) = listeners.join_next() => Some(joined),
        };

        let _ = stop_tx.send(true);
        let mut outcome = first.map_or(Ok(()), flatten);
        while let Some(joined) = listeners.join_next().await {
            let result = flatten(joined);
            if outcome.is_ok() {
                outcome = result;
            }
        }

        self.janitor.abort();
        tracing::info!("Server shutdown complete");
        outcome
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates a test router without starting the server.
    ///
    /// This is useful for integration testing.
    #[must_use]
    pub fn test_router(&self) -> Router {
        create_router(self.state.clone())
    }
}

fn flatten(joined: Result<anyhow::Result<()>, JoinError>) -> anyhow::Result<()> {
    joined?
}

async fn wait_for_stop(mut stop: watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

#[cfg(unix)]
mod unix {
    use std::os::unix::fs::FileTypeExt;
    use std::path::{Path, PathBuf};

    use anyhow::Context;
    use tokio::net::UnixListener;

    /// Removes the socket file when dropped.
    #[derive(Debug)]
    pub struct SocketFile(PathBuf);

    impl Drop for SocketFile {
        fn drop(&mut self) {
            if let Err(e) = std::fs::remove_file(&self.0) {
                tracing::warn!(path = %self.0.display(), error = %e, "unix socket dirty close");
            }
        }
    }

    /// Binds `path`, replacing a stale socket left by an unclean exit.
    pub fn bind(path: &Path) -> anyhow::Result<(UnixListener, SocketFile)> {
        if let Ok(meta) = std::fs::symlink_metadata(path) {
            if !meta.file_type().is_socket() {
                anyhow::bail!("{} exists and is not a socket", path.display());
            }
            std::fs::remove_file(path)
                .with_context(|| format!("cannot remove stale socket {}", path.display()))?;
        }

        let listener = UnixListener::bind(path)
            .with_context(|| format!("cannot listen on unix socket {}", path.display()))?;
        Ok((listener, SocketFile(path.to_path_buf())))
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
