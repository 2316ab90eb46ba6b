//! `PostgreSQL` implementation of the secret provider.

use async_trait::async_trait;
use folio_storage::{SecretProvider, SecretRecord, StorageResult};
use sqlx::PgPool;

use crate::error::from_sqlx_error;

/// `PostgreSQL` secret provider.
pub struct PgSecretProvider {
    pool: PgPool,
}

impl PgSecretProvider {
    /// Creates a new `PostgreSQL` secret provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecretProvider for PgSecretProvider {
    async fn get(&self) -> StorageResult<Option<SecretRecord>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT otp_key FROM otp_secret LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(row.map(|(otp_key,)| SecretRecord::new(otp_key)))
    }

    async fn insert(&self, record: &SecretRecord) -> StorageResult<()> {
        sqlx::query("INSERT INTO otp_secret (otp_key) VALUES ($1)")
            .bind(&record.otp_key)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        tracing::debug!("OTP secret row inserted");
        Ok(())
    }
}
