//! Keyed hashing.
//!
//! HMAC-SHA-1 is only exposed because RFC 6238 authenticators still default
//! to it. Nothing in folio signs data with it.

use aws_lc_rs::hmac;

fn sign(algorithm: hmac::Algorithm, key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(algorithm, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

/// Computes HMAC-SHA-1 of `data` under `key`.
#[must_use]
pub fn hmac_sha1(key: &[u8], data: &[u8]) -> Vec<u8> {
    sign(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key, data)
}

/// Computes HMAC-SHA-256 of `data` under `key`.
#[must_use]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    sign(hmac::HMAC_SHA256, key, data)
}

/// Computes HMAC-SHA-512 of `data` under `key`.
#[must_use]
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Vec<u8> {
    sign(hmac::HMAC_SHA512, key, data)
}
