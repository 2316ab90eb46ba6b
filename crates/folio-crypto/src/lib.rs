//! # folio-crypto
//!
//! Cryptographic primitives used by the folio authentication core.
//!
//! - [`hash`] - HMAC over SHA-1, SHA-256 and SHA-512 (backed by aws-lc-rs)
//! - [`random`] - operating system randomness that reports failure instead
//!   of degrading to a weaker generator
//! - [`base32`] - RFC 4648 base32, the encoding authenticator apps expect
//!   for shared secrets

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod base32;
pub mod error;
pub mod hash;
pub mod random;

pub use error::{CryptoError, CryptoResult};
pub use hash::{hmac_sha1, hmac_sha256, hmac_sha512};
pub use random::{random_bytes, random_hex};
