//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (a `.env` file is honoured). The TOML file is
//! taken from `FOLIO_CONFIG`, or `config.toml` in the working directory if
//! it exists.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use serde::Deserialize;

/// Default TOML file looked up when `FOLIO_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Where the OTP secret is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// A single owner-only file.
    File,
    /// One row in `PostgreSQL`.
    Postgres,
}

impl FromStr for SecretBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => anyhow::bail!("unknown secret backend '{other}'"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Site name, shown as the issuer in authenticator apps.
    pub app_name: String,

    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Serve on TCP at `host:port`.
    pub tcp: bool,

    /// Also serve on this Unix domain socket.
    pub unix_socket: Option<PathBuf>,

    /// Origin allowed by CORS. `None` allows any origin.
    pub cors_origin: Option<String>,

    /// Where the OTP secret lives.
    pub secret_backend: SecretBackend,

    /// Secret file path for the file backend.
    pub secret_file: PathBuf,

    /// Database URL for the postgres backend.
    pub database_url: Option<String>,

    /// Minimum database connections.
    pub db_min_connections: u32,

    /// Maximum database connections.
    pub db_max_connections: u32,

    /// Lifetime of the API key bucket in seconds.
    pub key_ttl_secs: u64,

    /// Interval of the expired-bucket sweep in seconds.
    pub janitor_interval_secs: u64,

    /// Random bytes per API key.
    pub key_bytes: usize,

    /// Accepted OTP clock skew in time steps.
    pub otp_skew: u32,

    /// Production mode: quieter default logging.
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: "folio".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            tcp: true,
            unix_socket: None,
            cors_origin: None,
            secret_backend: SecretBackend::File,
            secret_file: PathBuf::from(".otp"),
            database_url: None,
            db_min_connections: 1,
            db_max_connections: 5,
            key_ttl_secs: 3600,
            janitor_interval_secs: 7200,
            key_bytes: folio_auth::DEFAULT_KEY_BYTES,
            otp_skew: 1,
            production: false,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from defaults, the TOML file and the environment.
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = match std::env::var_os("FOLIO_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML configuration file on top of the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("cannot parse configuration file {}", path.display()))
    }

    /// Applies `FOLIO_*` overrides (and `DATABASE_URL`) from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FOLIO_APP_NAME") {
            self.app_name = v;
        }
        if let Some(v) = lookup("FOLIO_HOST") {
            self.host = v;
        }
        if let Some(v) = lookup("FOLIO_PORT") {
            self.port = parse_var("FOLIO_PORT", &v)?;
        }
        if let Some(v) = lookup("FOLIO_TCP") {
            self.tcp = parse_flag(&v);
        }
        if let Some(v) = lookup("FOLIO_UNIX_SOCKET") {
            self.unix_socket = non_empty(v).map(PathBuf::from);
        }
        if let Some(v) = lookup("FOLIO_CORS_ORIGIN") {
            self.cors_origin = non_empty(v);
        }
        if let Some(v) = lookup("FOLIO_SECRET_BACKEND") {
            self.secret_backend = v.parse()?;
        }
        if let Some(v) = lookup("FOLIO_SECRET_FILE") {
            self.secret_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database_url = non_empty(v);
        }
        if let Some(v) = lookup("FOLIO_DB_MIN_CONNECTIONS") {
            self.db_min_connections = parse_var("FOLIO_DB_MIN_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("FOLIO_DB_MAX_CONNECTIONS") {
            self.db_max_connections = parse_var("FOLIO_DB_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("FOLIO_KEY_TTL_SECS") {
            self.key_ttl_secs = parse_var("FOLIO_KEY_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("FOLIO_JANITOR_INTERVAL_SECS") {
            self.janitor_interval_secs = parse_var("FOLIO_JANITOR_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = lookup("FOLIO_KEY_BYTES") {
            self.key_bytes = parse_var("FOLIO_KEY_BYTES", &v)?;
        }
        if let Some(v) = lookup("FOLIO_OTP_SKEW") {
            self.otp_skew = parse_var("FOLIO_OTP_SKEW", &v)?;
        }
        if let Some(v) = lookup("FOLIO_PRODUCTION") {
            self.production = parse_flag(&v);
        }
        Ok(())
    }

    /// Rejects configurations the server cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.tcp && self.unix_socket.is_none() {
            anyhow::bail!("no listener configured: enable tcp or set unix_socket");
        }
        if self.key_bytes == 0 {
            anyhow::bail!("key_bytes must be positive");
        }
        if self.key_ttl_secs == 0 {
            anyhow::bail!("key_ttl_secs must be positive");
        }
        if self.key_ttl() > folio_cache::MAX_TTL {
            anyhow::bail!(
                "key_ttl_secs must be at most {}",
                folio_cache::MAX_TTL.as_secs()
            );
        }
        if self.otp_skew > folio_auth::MAX_SKEW {
            anyhow::bail!("otp_skew must be at most {}", folio_auth::MAX_SKEW);
        }
        if let Some(origin) = &self.cors_origin {
            HeaderValue::from_str(origin)
                .with_context(|| format!("cors_origin is not a valid origin: '{origin}'"))?;
        }
        if self.janitor_interval_secs == 0 {
            anyhow::bail!("janitor_interval_secs must be positive");
        }
        if self.secret_backend == SecretBackend::Postgres && self.database_url.is_none() {
            anyhow::bail!("the postgres secret backend requires DATABASE_URL");
        }
        Ok(())
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing(secret_file: &Path) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            secret_file: secret_file.to_path_buf(),
            key_ttl_secs: 60,
            janitor_interval_secs: 60,
            ..Self::default()
        }
    }

    /// Returns the API key bucket lifetime.
    #[must_use]
    pub const fn key_ttl(&self) -> Duration {
        Duration::from_secs(self.key_ttl_secs)
    }

    /// Returns the expired-bucket sweep interval.
    #[must_use]
    pub const fn janitor_interval(&self) -> Duration {
        Duration::from_secs(self.janitor_interval_secs)
    }

    /// Returns the default log filter when `RUST_LOG` is unset.
    #[must_use]
    pub const fn default_log_filter(&self) -> &'static str {
        if self.production {
            "info"
        } else {
            "info,folio_server=debug,folio_api=debug,folio_auth=debug"
        }
    }
}

fn parse_var<T>(name: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {name}: '{value}'"))
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "no" | "off")
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
