//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate`. The checks here
//! only reject obviously malformed bodies; the entities re-apply the full rules.

use forum_core::value_objects::{Patch, ProfileChanges};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::use_cases::{
    CreateConversationCommand, CreateMessageCommand, RegisterUserCommand, ResetPasswordCommand,
    SignInCommand, UpdateConversationCommand, UpdateMessageCommand, UpdatePasswordCommand,
    VerifyEmailCommand,
};

// ============================================================================
// Auth Requests
// ============================================================================

/// Sign-up request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

impl From<SignUpRequest> for RegisterUserCommand {
    fn from(request: SignUpRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            name: request.name,
        }
    }
}

/// Sign-in request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl SignInRequest {
    pub fn into_command(
        self,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> SignInCommand {
        SignInCommand {
            email: self.email,
            password: self.password,
            user_agent,
            ip_address,
        }
    }
}

/// Body carrying only an email address (OTP re-send, forgot password)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Email OTP verification request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub otp: String,
}

impl From<VerifyEmailRequest> for VerifyEmailCommand {
    fn from(request: VerifyEmailRequest) -> Self {
        Self {
            email: request.email,
            otp: request.otp,
        }
    }
}

/// Password reset with an emailed token
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,
}

impl From<ResetPasswordRequest> for ResetPasswordCommand {
    fn from(request: ResetPasswordRequest) -> Self {
        Self {
            token: request.token,
            new_password: request.new_password,
        }
    }
}

// ============================================================================
// Conversation Requests
// ============================================================================

/// Create conversation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateConversationRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

impl CreateConversationRequest {
    pub fn into_command(self, author_id: Uuid) -> CreateConversationCommand {
        CreateConversationCommand {
            author_id,
            title: self.title,
            content: self.content,
        }
    }
}

/// Update conversation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateConversationRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
}

impl UpdateConversationRequest {
    pub fn into_command(self, conversation_id: Uuid, user_id: Uuid) -> UpdateConversationCommand {
        UpdateConversationCommand {
            conversation_id,
            user_id,
            title: self.title,
        }
    }
}

// ============================================================================
// Message Requests
// ============================================================================

/// Create message request (conversation given in the body)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessageRequest {
    pub conversation_id: Uuid,

    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

impl CreateMessageRequest {
    pub fn into_command(self, author_id: Uuid) -> CreateMessageCommand {
        CreateMessageCommand {
            conversation_id: self.conversation_id,
            author_id,
            content: self.content,
        }
    }
}

/// Reply request (conversation given in the path), also used for edits
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MessageContentRequest {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

impl MessageContentRequest {
    pub fn into_create_command(self, conversation_id: Uuid, author_id: Uuid) -> CreateMessageCommand {
        CreateMessageCommand {
            conversation_id,
            author_id,
            content: self.content,
        }
    }

    pub fn into_update_command(self, message_id: Uuid, user_id: Uuid) -> UpdateMessageCommand {
        UpdateMessageCommand {
            message_id,
            user_id,
            content: self.content,
        }
    }
}

// ============================================================================
// User Requests
// ============================================================================

/// Partial profile update
///
/// An absent key leaves the field alone, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_name_patch"))]
    pub name: Patch<String>,

    #[serde(default)]
    pub bio: Patch<String>,
}

fn validate_name_patch(name: &Patch<String>) -> Result<(), ValidationError> {
    match name {
        Patch::Set(value) if value.chars().count() > 100 => Err(ValidationError::new("length")
            .with_message("Name must be at most 100 characters".into())),
        _ => Ok(()),
    }
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            name: request.name,
            bio: request.bio,
        }
    }
}

/// Password change for a signed-in user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,

    #[serde(default = "default_true")]
    pub revoke_other_sessions: bool,
}

fn default_true() -> bool {
    true
}

impl UpdatePasswordRequest {
    pub fn into_command(self, user_id: Uuid, session_id: Uuid) -> UpdatePasswordCommand {
        UpdatePasswordCommand {
            user_id,
            session_id,
            current_password: self.current_password,
            new_password: self.new_password,
            revoke_other_sessions: self.revoke_other_sessions,
        }
    }
}
