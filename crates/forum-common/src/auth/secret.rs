//! One-time secrets: email OTPs and password reset tokens
//!
//! Only SHA-256 digests of these values are ever stored.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

pub const OTP_LENGTH: usize = 6;
const TOKEN_BYTES: usize = 32;

/// Generate a zero-padded numeric OTP
#[must_use]
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:0width$}", width = OTP_LENGTH)
}

/// Generate a URL-safe random token
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Lowercase hex SHA-256 digest
#[must_use]
pub fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Compare a candidate secret with a stored digest without early exit
#[must_use]
pub fn secrets_match(candidate: &str, stored_digest: &str) -> bool {
    let digest = sha256_hex(candidate);
    if digest.len() != stored_digest.len() {
        return false;
    }
    digest
        .bytes()
        .zip(stored_digest.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
