//! Route definitions
//!
//! All API routes organized by resource and mounted under /api/v1.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use forum_service::use_cases::AVATAR_MAX_BYTES;

use crate::handlers::{auth, conversations, health, messages, users};
use crate::state::AppState;

/// Prefix every JSON route lives under
pub const API_PREFIX: &str = "/api/v1";

/// Request body cap on the avatar route
///
/// Slightly above the image limit so an oversized file still reaches the
/// use case and gets its `FILE_TOO_LARGE` answer.
pub const AVATAR_BODY_LIMIT: usize = AVATAR_MAX_BYTES + 64 * 1024;

/// Create the rate-limited API router (health is mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest(API_PREFIX, api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new().nest(
        API_PREFIX,
        Router::new()
            .route("/health", get(health::health_check))
            .route("/health/ready", get(health::readiness_check)),
    )
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(conversation_routes())
        .merge(message_routes())
        .merge(user_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/session", get(auth::get_session))
        .route("/auth/email-otp/send", post(auth::send_email_otp))
        .route("/auth/email-otp/verify", post(auth::verify_email_otp))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
}

fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route(
            "/conversations/:id",
            get(conversations::get_conversation)
                .patch(conversations::update_conversation)
                .delete(conversations::delete_conversation),
        )
        .route(
            "/conversations/:id/messages",
            post(conversations::reply_to_conversation),
        )
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(messages::create_message))
        .route(
            "/messages/:id",
            patch(messages::update_message).delete(messages::delete_message),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/profile",
            get(users::get_profile).patch(users::update_profile),
        )
        .route(
            "/users/profile/avatar",
            patch(users::update_avatar).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
        .route("/users/profile/password", patch(users::update_password))
        .route("/users/:id/contributions", get(users::get_contributions))
}
