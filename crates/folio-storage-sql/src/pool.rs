//! Connection pool and schema setup.

use std::time::Duration;

use folio_storage::{StorageError, StorageResult};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// How long a login waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects to `url` with between `min_connections` and `max_connections`
/// open connections.
///
/// # Errors
///
/// Returns `StorageError::Connection` if the database is unreachable.
pub async fn create_pool(
    url: &str,
    min_connections: u32,
    max_connections: u32,
) -> StorageResult<PgPool> {
    PgPoolOptions::new()
        .min_connections(min_connections)
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))
}

/// Creates the `otp_secret` table if it does not exist yet.
///
/// # Errors
///
/// Returns `StorageError::Query` if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> StorageResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StorageError::Query(e.to_string()))
}
