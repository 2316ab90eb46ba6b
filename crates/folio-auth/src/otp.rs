//! Time-based one-time passwords (RFC 6238 over RFC 4226 HOTP).
//!
//! folio pins its parameters to 8 digits, HMAC-SHA-512 and a 30 second
//! step. Some authenticator apps silently ignore the algorithm and digit
//! count in the provisioning URI; those need manual entry.

use std::time::{SystemTime, UNIX_EPOCH};

use folio_crypto::{base32, hmac_sha1, hmac_sha256, hmac_sha512, random_bytes};
use subtle::{Choice, ConstantTimeEq};

use crate::error::{AuthError, AuthResult};

/// Length of freshly generated shared secrets, in bytes.
pub const SECRET_BYTES: usize = 20;

/// Largest accepted clock skew, in steps on each side.
pub const MAX_SKEW: u32 = 10;

/// OTP hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpAlgorithm {
    /// HMAC-SHA1.
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl OtpAlgorithm {
    /// Name as used in `otpauth://` URIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

/// TOTP configuration.
#[derive(Debug, Clone)]
pub struct TotpConfig {
    /// Number of digits in the OTP.
    pub digits: u8,
    /// Time step in seconds.
    pub period: u32,
    /// Hash algorithm.
    pub algorithm: OtpAlgorithm,
    /// Steps accepted before and after the current one, for clock drift.
    pub skew: u32,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            digits: 8,
            period: 30,
            algorithm: OtpAlgorithm::Sha512,
            skew: 1,
        }
    }
}

impl TotpConfig {
    /// Creates a new TOTP configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of digits.
    #[must_use]
    pub const fn digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Sets the time step in seconds.
    #[must_use]
    pub const fn period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Sets the hash algorithm.
    #[must_use]
    pub const fn algorithm(mut self, algorithm: OtpAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the accepted clock skew in steps.
    #[must_use]
    pub const fn skew(mut self, steps: u32) -> Self {
        self.skew = steps;
        self
    }

    /// Checks that the parameters can produce codes at all.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` for a zero period, a digit
    /// count outside `1..=9` or a skew above [`MAX_SKEW`].
    pub fn check(&self) -> AuthResult<()> {
        if self.period == 0 {
            return Err(AuthError::Configuration("TOTP period must be positive".into()));
        }
        if !(1..=9).contains(&self.digits) {
            return Err(AuthError::Configuration(format!(
                "TOTP digits must be between 1 and 9, got {}",
                self.digits
            )));
        }
        if self.skew > MAX_SKEW {
            return Err(AuthError::Configuration(format!(
                "TOTP skew must be at most {MAX_SKEW} steps, got {}",
                self.skew
            )));
        }
        Ok(())
    }

    fn counter_at(&self, now: SystemTime) -> AuthResult<u64> {
        let elapsed = now
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(elapsed.as_secs() / u64::from(self.period))
    }
}

/// OTP verifier.
pub struct OtpVerifier;

impl OtpVerifier {
    /// Checks `code` against the base32 `secret` at time `now`.
    ///
    /// Accepts the code of the current step and of `config.skew` steps on
    /// either side. Every candidate is compared in constant time and all
    /// candidates are always computed. A code with the wrong length or
    /// non-digit characters is simply `false`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the secret is not decodable
    /// or the configuration is unusable.
    pub fn validate(
        code: &str,
        secret: &str,
        now: SystemTime,
        config: &TotpConfig,
    ) -> AuthResult<bool> {
        config.check()?;
        let key = Self::decode_secret(secret)?;
        let current = config.counter_at(now)?;

        if code.len() != usize::from(config.digits) || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(false);
        }

        let first = current.saturating_sub(u64::from(config.skew));
        let last = current.saturating_add(u64::from(config.skew));
        let mut matched = Choice::from(0);
        for counter in first..=last {
            let expected = Self::generate_hotp(&key, counter, config.digits, config.algorithm);
            matched |= expected.as_bytes().ct_eq(code.as_bytes());
        }

        Ok(bool::from(matched))
    }

    /// Generates the code for the base32 `secret` at time `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the secret is not decodable.
    pub fn generate_at(secret: &str, now: SystemTime, config: &TotpConfig) -> AuthResult<String> {
        config.check()?;
        let key = Self::decode_secret(secret)?;
        let counter = config.counter_at(now)?;
        Ok(Self::generate_hotp(&key, counter, config.digits, config.algorithm))
    }

    /// Generates an HOTP code from raw key bytes and a counter.
    #[must_use]
    pub fn generate_hotp(key: &[u8], counter: u64, digits: u8, algorithm: OtpAlgorithm) -> String {
        let hmac = Self::compute_hmac(key, counter, algorithm);
        let code = Self::truncate(&hmac, digits);
        format!("{:0width$}", code, width = usize::from(digits))
    }

    /// Decodes a base32 secret into key bytes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` for invalid or empty secrets.
    pub fn decode_secret(secret: &str) -> AuthResult<Vec<u8>> {
        let key = base32::decode(secret)
            .map_err(|e| AuthError::Configuration(format!("malformed OTP secret: {e}")))?;
        if key.is_empty() {
            return Err(AuthError::Configuration("OTP secret is empty".into()));
        }
        Ok(key)
    }

    fn compute_hmac(key: &[u8], counter: u64, algorithm: OtpAlgorithm) -> Vec<u8> {
        let counter_bytes = counter.to_be_bytes();

        match algorithm {
            OtpAlgorithm::Sha1 => hmac_sha1(key, &counter_bytes),
            OtpAlgorithm::Sha256 => hmac_sha256(key, &counter_bytes),
            OtpAlgorithm::Sha512 => hmac_sha512(key, &counter_bytes),
        }
    }

    fn truncate(hmac: &[u8], digits: u8) -> u32 {
        let offset = (hmac.last().unwrap_or(&0) & 0x0f) as usize;
        let code = u32::from_be_bytes([
            hmac.get(offset).copied().unwrap_or(0) & 0x7f,
            hmac.get(offset + 1).copied().unwrap_or(0),
            hmac.get(offset + 2).copied().unwrap_or(0),
            hmac.get(offset + 3).copied().unwrap_or(0),
        ]);
        code % 10_u32.pow(u32::from(digits))
    }
}

/// Generates a new random shared secret, base32 encoded.
///
/// # Errors
///
/// Returns `AuthError::Entropy` if the random source is unavailable.
pub fn generate_secret() -> AuthResult<String> {
    let bytes = random_bytes(SECRET_BYTES)?;
    Ok(base32::encode(&bytes))
}

/// Builds the `otpauth://` URI authenticator apps enrol from.
#[must_use]
pub fn provisioning_uri(secret: &str, issuer: &str, account: &str, config: &TotpConfig) -> String {
    let issuer = urlencoding::encode(issuer);
    let account = urlencoding::encode(account);
    format!(
        "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}&algorithm={}&digits={}&period={}",
        config.algorithm.as_str(),
        config.digits,
        config.period,
    )
}
