//! Read models - denormalized projections returned by queries
//!
//! These never carry soft-deleted rows; the store filters them out.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Authors
// ============================================================================

/// Author as shown in conversation listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

/// Author as shown inside a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
}

// ============================================================================
// Conversations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastMessage {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
}

/// One row of the conversation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationListItem {
    pub id: Uuid,
    pub title: String,
    pub author: AuthorSummary,
    pub message_count: i64,
    pub last_message: Option<LastMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadMessage {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorProfile,
}

/// A conversation with its messages, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationThread {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorProfile,
    pub messages: Vec<ThreadMessage>,
}

// ============================================================================
// Users
// ============================================================================

/// The signed-in user's own profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Public part of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationContribution {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageContribution {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub conversation_id: Uuid,
    pub conversation_title: String,
}

/// Everything a user has posted, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserContributions {
    pub user: ContributionUser,
    pub conversations: Vec<ConversationContribution>,
    pub messages: Vec<MessageContribution>,
}
