//! API key issuance.

use std::sync::Arc;

use folio_cache::KeyCache;
use folio_crypto::random_hex;

use crate::error::AuthResult;

/// Default key length in bytes (16 hex characters).
pub const DEFAULT_KEY_BYTES: usize = 8;

/// Mints API keys and registers them in the key cache.
#[derive(Clone)]
pub struct KeyIssuer {
    cache: Arc<dyn KeyCache>,
    key_bytes: usize,
}

impl KeyIssuer {
    /// Creates an issuer drawing `key_bytes` random bytes per key.
    #[must_use]
    pub fn new(cache: Arc<dyn KeyCache>, key_bytes: usize) -> Self {
        Self { cache, key_bytes }
    }

    /// The cache keys are registered in.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn KeyCache> {
        &self.cache
    }

    /// Generates a fresh hex key and adds it to the cache.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Entropy` if the OS random source fails. No
    /// weaker generator is tried.
    pub fn issue_key(&self) -> AuthResult<String> {
        let key = random_hex(self.key_bytes)?;
        self.cache.add(&key);
        Ok(key)
    }
}

impl std::fmt::Debug for KeyIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyIssuer")
            .field("key_bytes", &self.key_bytes)
            .finish_non_exhaustive()
    }
}
