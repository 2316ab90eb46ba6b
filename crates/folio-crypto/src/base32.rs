//! RFC 4648 base32 (standard alphabet).
//!
//! Encoding never emits padding. Decoding is lenient about what humans and
//! authenticator apps do to secrets: lowercase letters, embedded spaces and
//! trailing `=` padding are all accepted.

use crate::error::{CryptoError, CryptoResult};

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Encodes bytes as unpadded base32.
#[must_use]
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut buffer: u64 = 0;
    let mut bits = 0u32;

    for &byte in data {
        buffer = (buffer << 8) | u64::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            let index = ((buffer >> bits) & 0x1f) as usize;
            out.push(char::from(ALPHABET[index]));
        }
    }

    if bits > 0 {
        let index = ((buffer << (5 - bits)) & 0x1f) as usize;
        out.push(char::from(ALPHABET[index]));
    }

    out
}

/// Decodes base32 text.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` on characters outside the alphabet
/// or on a length no encoder could have produced.
pub fn decode(input: &str) -> CryptoResult<Vec<u8>> {
    let cleaned: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let trimmed = match cleaned.iter().rposition(|&b| b != b'=') {
        Some(last) => &cleaned[..=last],
        None => &cleaned[..0],
    };

    // 1, 3 and 6 trailing characters cannot come out of a 5-bit grouping.
    if matches!(trimmed.len() % 8, 1 | 3 | 6) {
        return Err(CryptoError::InvalidEncoding(format!(
            "length {} is not a valid base32 length",
            trimmed.len()
        )));
    }

    let mut out = Vec::with_capacity(trimmed.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits = 0u32;

    for &c in trimmed {
        let value = decode_char(c).ok_or_else(|| {
            CryptoError::InvalidEncoding(format!("character {:?}", char::from(c)))
        })?;
        buffer = (buffer << 5) | u64::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((buffer >> bits) & 0xff) as u8);
        }
    }

    Ok(out)
}

fn decode_char(c: u8) -> Option<u8> {
    match c.to_ascii_uppercase() {
        c @ b'A'..=b'Z' => Some(c - b'A'),
        c @ b'2'..=b'7' => Some(c - b'2' + 26),
        _ => None,
    }
}
