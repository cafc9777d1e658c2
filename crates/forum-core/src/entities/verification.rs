//! Verification entity - a hashed one-time secret (email OTP or reset token)

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// What a verification secret unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationPurpose {
    EmailVerification,
    PasswordReset,
}

impl VerificationPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailVerification => "email_verification",
            Self::PasswordReset => "password_reset",
        }
    }

    /// Parse the stored representation
    ///
    /// # Errors
    /// Returns `DomainError::Internal` for an unknown value
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "email_verification" => Ok(Self::EmailVerification),
            "password_reset" => Ok(Self::PasswordReset),
            other => Err(DomainError::Internal(format!(
                "Unknown verification purpose: {other}"
            ))),
        }
    }
}

impl fmt::Display for VerificationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verification entity
///
/// Only the SHA-256 digest of the secret is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub purpose: VerificationPurpose,
    pub secret_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Verification {
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        purpose: VerificationPurpose,
        secret_hash: String,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            purpose,
            secret_hash,
            expires_at: now + lifetime,
            attempts: 0,
            consumed_at: None,
            created_at: now,
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Still redeemable given an attempt limit
    pub fn is_usable(&self, max_attempts: i32) -> bool {
        !self.is_consumed() && !self.is_expired() && self.attempts < max_attempts
    }
}
