//! # folio
//!
//! Entry point for the folio site backend.

#![forbid(unsafe_code)]

use folio_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(app = %config.app_name, "folio starting");

    let server = Server::new(config).await?;
    server.run().await
}
