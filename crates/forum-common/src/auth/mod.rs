//! Authentication utilities

mod jwt;
mod password;
mod secret;

pub use jwt::{JwtService, SessionClaims, SessionToken};
pub use password::{hash_password, verify_password};
pub use secret::{generate_otp, generate_token, secrets_match, sha256_hex, OTP_LENGTH};
