//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Read models from
//! `forum-core` (conversation lists, threads, profiles, contributions) are
//! serialized as they are.

use chrono::{DateTime, Utc};
use forum_core::read_models::UserProfile;
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Common Response Types
// ============================================================================

/// Plain acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Account created
#[derive(Debug, Clone, Serialize)]
pub struct SignUpResponse {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// Signed in, with the bearer token for the new session
#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of revoking sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignOutResponse {
    pub success: bool,
    pub revoked_sessions: u64,
}

/// The session a request was made with
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Current user and session
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: UserProfile,
    pub session: SessionInfo,
}

// ============================================================================
// Conversation & Message Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateConversationResponse {
    pub conversation_id: Uuid,
    pub message_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageResponse {
    pub message_id: Uuid,
}

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePasswordResponse {
    pub success: bool,
    pub revoked_sessions: u64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
