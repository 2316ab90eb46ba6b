//! Volatile secret provider.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{StorageError, StorageResult};
use crate::secret::{SecretProvider, SecretRecord};

/// Keeps the secret in process memory. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySecretProvider {
    record: Mutex<Option<SecretRecord>>,
}

impl InMemorySecretProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider pre-loaded with `otp_key`.
    #[must_use]
    pub fn with_secret(otp_key: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(SecretRecord::new(otp_key))),
        }
    }
}

#[async_trait]
impl SecretProvider for InMemorySecretProvider {
    async fn get(&self) -> StorageResult<Option<SecretRecord>> {
        Ok(self.record.lock().clone())
    }

    async fn insert(&self, record: &SecretRecord) -> StorageResult<()> {
        let mut slot = self.record.lock();
        if slot.is_some() {
            return Err(StorageError::AlreadyExists("OTP secret"));
        }
        *slot = Some(record.clone());
        Ok(())
    }
}
