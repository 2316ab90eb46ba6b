//! # folio-auth
//!
//! Authentication core for the folio site backend.
//!
//! A single administrator logs in with a time-based one-time password and
//! receives a short-lived hex API key. Everything else in the backend only
//! asks one question: is this key currently live?
//!
//! ## Modules
//!
//! - [`otp`] - RFC 6238 TOTP generation and constant-time validation
//! - [`secret`] - bootstrap and lookup of the shared OTP secret
//! - [`issuer`] - API key minting
//! - [`login`] - the OTP-for-key exchange tying the above together
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use folio_auth::{KeyIssuer, OtpLogin, SecretStore, TotpConfig};
//!
//! let store = SecretStore::new(provider, "folio", TotpConfig::default());
//! store.initialize().await?;
//!
//! let login = OtpLogin::new(store, KeyIssuer::new(cache, 8));
//! let api_key = login.login("12345678").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod issuer;
pub mod login;
pub mod otp;
pub mod secret;

pub use error::{AuthError, AuthResult};
pub use issuer::{KeyIssuer, DEFAULT_KEY_BYTES};
pub use login::OtpLogin;
pub use otp::{
    generate_secret, provisioning_uri, OtpAlgorithm, OtpVerifier, TotpConfig, MAX_SKEW,
};
pub use secret::{InitOutcome, SecretStore};
