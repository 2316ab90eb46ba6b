//! Crypto error types.

use thiserror::Error;

/// Errors raised by the crypto helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The operating system random source could not be read.
    #[error("secure random source unavailable: {0}")]
    Entropy(String),

    /// Input was not valid base32.
    #[error("invalid base32 input: {0}")]
    InvalidEncoding(String),
}

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
