//! Domain errors - the closed set of failure kinds for the forum

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
///
/// Callers branch on the variant, never on the rendered message.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Uuid),

    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    #[error("Session not found")]
    SessionNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: max {max_bytes} bytes")]
    FileTooLarge { max_bytes: usize },

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Session is no longer valid")]
    SessionInvalid,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Email address must be verified before signing in")]
    EmailNotVerified,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    DuplicateEmail,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Build a validation error for a named field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Build an ownership failure
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::SessionNotFound => "UNKNOWN_SESSION",

            // Validation
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",

            // Authentication
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::SessionInvalid => "SESSION_INVALID",

            // Authorization
            Self::Forbidden(_) => "FORBIDDEN",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",

            // Conflict
            Self::DuplicateEmail => "DUPLICATE_EMAIL",

            // Infrastructure
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Email(_) => "EMAIL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Name of the offending field for validation errors
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ConversationNotFound(_)
                | Self::MessageNotFound(_)
                | Self::SessionNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::UnsupportedFormat(_))
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::InvalidToken | Self::SessionInvalid
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::EmailNotVerified)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateEmail)
    }

    /// Check if the payload was rejected for its size
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self, Self::FileTooLarge { .. })
    }
}
