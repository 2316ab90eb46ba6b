//! Cryptographically secure random generation.
//!
//! Every function here reads the operating system RNG directly and returns
//! [`CryptoError::Entropy`] when it cannot. There is no fallback to a
//! seeded or thread-local generator.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::error::{CryptoError, CryptoResult};

/// Fills a fresh buffer of `len` bytes from the operating system RNG.
///
/// # Errors
///
/// Returns `CryptoError::Entropy` if the random source is unavailable.
pub fn random_bytes(len: usize) -> CryptoResult<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(bytes)
}

/// Generates `len` random bytes and returns them as lowercase hex.
///
/// The result is `2 * len` characters long.
///
/// # Errors
///
/// Returns `CryptoError::Entropy` if the random source is unavailable.
pub fn random_hex(len: usize) -> CryptoResult<String> {
    let bytes = random_bytes(len)?;
    Ok(hex::encode(bytes))
}
