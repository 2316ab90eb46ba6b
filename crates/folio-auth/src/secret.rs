//! OTP secret bootstrap and lookup.

use std::sync::Arc;

use folio_storage::{SecretProvider, SecretRecord};

use crate::error::{AuthError, AuthResult};
use crate::otp::{generate_secret, provisioning_uri, TotpConfig};

/// What [`SecretStore::initialize`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A secret was already persisted; nothing changed.
    Existing,
    /// A new secret was generated and persisted.
    Generated,
}

/// Access to the single admin OTP secret.
#[derive(Clone)]
pub struct SecretStore {
    provider: Arc<dyn SecretProvider>,
    issuer: String,
    account: String,
    config: TotpConfig,
}

impl SecretStore {
    /// Creates a store over `provider`.
    ///
    /// `issuer` is the label authenticator apps show for the entry.
    #[must_use]
    pub fn new(
        provider: Arc<dyn SecretProvider>,
        issuer: impl Into<String>,
        config: TotpConfig,
    ) -> Self {
        let issuer = issuer.into();
        let account = format!("admin@{issuer}");
        Self {
            provider,
            issuer,
            account,
            config,
        }
    }

    /// TOTP parameters codes are checked against.
    #[must_use]
    pub const fn config(&self) -> &TotpConfig {
        &self.config
    }

    /// Makes sure a secret exists, generating one on first start.
    ///
    /// On generation the provisioning URI is logged once so the admin can
    /// enrol an authenticator. Calling this again is a no-op.
    pub async fn initialize(&self) -> AuthResult<InitOutcome> {
        if self.provider.get().await?.is_some() {
            tracing::debug!("OTP secret already provisioned");
            return Ok(InitOutcome::Existing);
        }

        let secret = generate_secret()?;
        match self.provider.insert(&SecretRecord::new(secret.as_str())).await {
            Ok(()) => {}
            // Lost a race against another instance; theirs wins.
            Err(e) if e.is_already_exists() => return Ok(InitOutcome::Existing),
            Err(e) => return Err(e.into()),
        }

        let uri = provisioning_uri(&secret, &self.issuer, &self.account, &self.config);
        tracing::warn!(
            provisioning_uri = %uri,
            "generated new OTP secret; enrol it in an authenticator now, it is not shown again"
        );
        Ok(InitOutcome::Generated)
    }

    /// Reads the persisted base32 secret.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SecretNotFound` if none is stored and
    /// `AuthError::Storage` if the medium cannot be read.
    pub async fn secret(&self) -> AuthResult<String> {
        self.provider
            .get()
            .await?
            .map(|record| record.otp_key)
            .ok_or(AuthError::SecretNotFound)
    }
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore")
            .field("issuer", &self.issuer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
