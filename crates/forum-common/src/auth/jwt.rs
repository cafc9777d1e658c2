//! Session tokens
//!
//! A signed JWT only identifies a session row; the row decides whether the
//! session is still alive. Encoding and decoding use the `jsonwebtoken` crate.

use chrono::{DateTime, Duration, Utc};
use forum_core::Session;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Session ID
    pub sid: String,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// # Errors
    /// Returns `AppError::InvalidToken` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    /// # Errors
    /// Returns `AppError::InvalidToken` if the session id is not a UUID
    pub fn session_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sid).map_err(|_| AppError::InvalidToken)
    }
}

/// A signed bearer token and when it stops being accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT service for encoding and decoding session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and session lifetime in seconds
    #[must_use]
    pub fn new(secret: &str, session_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_expiry,
        }
    }

    /// Lifetime given to new sessions
    #[must_use]
    pub fn session_lifetime(&self) -> Duration {
        Duration::seconds(self.session_expiry)
    }

    /// Sign a token for a stored session; it expires together with the session
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_session_token(
        &self,
        session: &Session,
        email: &str,
    ) -> Result<SessionToken, AppError> {
        let claims = SessionClaims {
            sub: session.user_id.to_string(),
            sid: session.id.to_string(),
            email: email.to_string(),
            iat: Utc::now().timestamp(),
            exp: session.expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))?;

        Ok(SessionToken {
            token,
            expires_at: session.expires_at,
        })
    }

    /// Decode and validate a session token
    ///
    /// # Errors
    /// Returns `TokenExpired` or `InvalidToken`
    pub fn validate_session_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        let validation = Validation::default();

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("session_expiry", &self.session_expiry)
            .finish_non_exhaustive()
    }
}
