//! OTP-for-key exchange.

use std::time::SystemTime;

use crate::error::{AuthError, AuthResult};
use crate::issuer::KeyIssuer;
use crate::otp::OtpVerifier;
use crate::secret::SecretStore;

/// Exchanges a valid one-time password for a fresh API key.
#[derive(Debug, Clone)]
pub struct OtpLogin {
    store: SecretStore,
    issuer: KeyIssuer,
}

impl OtpLogin {
    /// Creates a login flow over the given secret store and key issuer.
    #[must_use]
    pub const fn new(store: SecretStore, issuer: KeyIssuer) -> Self {
        Self { store, issuer }
    }

    /// The secret store codes are checked against.
    #[must_use]
    pub const fn store(&self) -> &SecretStore {
        &self.store
    }

    /// The issuer that mints keys on success.
    #[must_use]
    pub const fn issuer(&self) -> &KeyIssuer {
        &self.issuer
    }

    /// Checks `code` against the current time and issues a key.
    pub async fn login(&self, code: &str) -> AuthResult<String> {
        self.login_at(code, SystemTime::now()).await
    }

    /// Checks `code` as of `now` and issues a key.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidOtp` if the code does not match
    /// - `AuthError::SecretNotFound` if no secret is provisioned
    /// - `AuthError::Configuration` if the stored secret is corrupt
    /// - `AuthError::Storage` if the secret cannot be read
    /// - `AuthError::Entropy` if no key could be generated
    pub async fn login_at(&self, code: &str, now: SystemTime) -> AuthResult<String> {
        let secret = self.store.secret().await?;
        let code = code.trim();

        if !OtpVerifier::validate(code, &secret, now, self.store.config())? {
            tracing::warn!("login rejected: invalid one-time password");
            return Err(AuthError::InvalidOtp);
        }

        let key = self.issuer.issue_key().inspect_err(|e| {
            tracing::error!(error = %e, "failed to issue API key");
        })?;
        tracing::info!("admin logged in, API key issued");
        Ok(key)
    }
}
