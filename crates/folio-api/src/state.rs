//! Shared auth state.

use std::sync::Arc;

use folio_auth::OtpLogin;
use folio_cache::KeyCache;

/// State shared by the bearer gate and the auth handlers.
///
/// Cheap to clone; everything inside is reference counted.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// OTP login flow, including the secret store and key issuer.
    pub login: OtpLogin,
}

impl AuthState {
    /// Creates the auth state.
    #[must_use]
    pub const fn new(login: OtpLogin) -> Self {
        Self { login }
    }

    /// The key cache bearer tokens are checked against.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn KeyCache> {
        self.login.issuer().cache()
    }
}
