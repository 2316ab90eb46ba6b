//! OTP secret provider trait.

use async_trait::async_trait;

use crate::error::StorageResult;

/// The persisted admin OTP secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// Base32-encoded TOTP shared secret.
    pub otp_key: String,
}

impl SecretRecord {
    /// Wraps a base32 secret.
    #[must_use]
    pub fn new(otp_key: impl Into<String>) -> Self {
        Self {
            otp_key: otp_key.into(),
        }
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("otp_key", &"<redacted>")
            .finish()
    }
}

/// Provider for the single OTP secret record.
///
/// Implementations must be thread-safe. Reads happen on every login
/// attempt; writes only during startup initialization.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Loads the secret record, or `None` if none has been stored yet.
    async fn get(&self) -> StorageResult<Option<SecretRecord>>;

    /// Persists the secret record.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::AlreadyExists` if a record is already stored.
    async fn insert(&self, record: &SecretRecord) -> StorageResult<()>;
}
