//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs, convertible into use case commands
//! - Response DTOs for serializing API outputs

pub mod requests;
pub mod responses;

pub use requests::{
    CreateConversationRequest, CreateMessageRequest, EmailRequest, MessageContentRequest,
    ResetPasswordRequest, SignInRequest, SignUpRequest, UpdateConversationRequest,
    UpdatePasswordRequest, UpdateProfileRequest, VerifyEmailRequest,
};

pub use responses::{
    AvatarResponse, CreateConversationResponse, CreateMessageResponse, HealthChecks,
    HealthResponse, ReadinessResponse, SessionInfo, SessionResponse, SignInResponse,
    SignOutResponse, SignUpResponse, SuccessResponse, UpdatePasswordResponse,
};
