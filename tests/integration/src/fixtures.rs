//! Test fixtures and data generators
//!
//! Request bodies with unique emails, and the response shapes tests read back.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::helpers::{assert_json, TestServer};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Password that satisfies every account rule
pub const TEST_PASSWORD: &str = "TestPass123!";

/// Get a unique suffix for test data
///
/// Combined with the process id so reruns against the same database do not
/// collide on email addresses.
pub fn unique_suffix() -> String {
    format!(
        "{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

/// Sign-up request
#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl SignUpRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            email: format!("user{suffix}@example.com"),
            password: TEST_PASSWORD.to_string(),
            name: Some(format!("User {suffix}")),
        }
    }
}

/// Sign-in request
#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl SignInRequest {
    pub fn from_sign_up(request: &SignUpRequest) -> Self {
        Self {
            email: request.email.clone(),
            password: request.password.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpResponse {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct RevokedResponse {
    pub success: bool,
    pub revoked_sessions: u64,
}

/// Create conversation request
#[derive(Debug, Serialize)]
pub struct CreateConversationRequest {
    pub title: String,
    pub content: String,
}

impl CreateConversationRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            title: format!("Conversation {suffix}"),
            content: format!("Opening post {suffix}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateConversationResponse {
    pub conversation_id: Uuid,
    pub message_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateMessageResponse {
    pub message_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// A signed-in account
#[derive(Debug)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub token: String,
}

impl TestUser {
    /// Sign up a fresh account and sign it in
    pub async fn create(server: &TestServer) -> anyhow::Result<Self> {
        let request = SignUpRequest::unique();
        let response = server.post("/auth/signup", &request).await?;
        let signed_up: SignUpResponse = assert_json(response, reqwest::StatusCode::CREATED).await?;

        let token = Self::sign_in(server, &request.email, &request.password).await?;

        Ok(Self {
            id: signed_up.user_id,
            email: request.email,
            password: request.password,
            token,
        })
    }

    /// Open another session for an existing account
    pub async fn sign_in(server: &TestServer, email: &str, password: &str) -> anyhow::Result<String> {
        let response = server
            .post(
                "/auth/signin",
                &SignInRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        let signed_in: SignInResponse = assert_json(response, reqwest::StatusCode::OK).await?;
        Ok(signed_in.token)
    }
}
