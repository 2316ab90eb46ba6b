//! Authentication error types.

use folio_crypto::CryptoError;
use folio_storage::StorageError;
use thiserror::Error;

/// Authentication operation errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted one-time password did not match.
    #[error("invalid one-time password")]
    InvalidOtp,

    /// No OTP secret has been provisioned.
    #[error("OTP secret not provisioned")]
    SecretNotFound,

    /// The secret or TOTP parameters are unusable.
    #[error("authentication configuration error: {0}")]
    Configuration(String),

    /// The secret store could not be reached.
    #[error("secret storage error: {0}")]
    Storage(#[from] StorageError),

    /// No secure randomness was available for key or secret generation.
    #[error("secure random source unavailable: {0}")]
    Entropy(String),

    /// Internal error.
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl From<CryptoError> for AuthError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Entropy(msg) => Self::Entropy(msg),
            CryptoError::InvalidEncoding(msg) => Self::Configuration(msg),
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
