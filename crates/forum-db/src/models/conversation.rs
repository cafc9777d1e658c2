//! Conversation database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for conversations table
#[derive(Debug, Clone, FromRow)]
pub struct ConversationModel {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ConversationModel {
    /// Check if conversation is soft deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One row of the conversation listing, flattened across joins
#[derive(Debug, Clone, FromRow)]
pub struct ConversationListRow {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub author_email: String,
    pub message_count: i64,
    pub last_message_id: Option<Uuid>,
    pub last_message_content: Option<String>,
    pub last_message_created_at: Option<DateTime<Utc>>,
    pub last_message_author_name: Option<String>,
}

/// A conversation with its live message count, for contributions pages
#[derive(Debug, Clone, FromRow)]
pub struct ConversationContributionRow {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: i64,
}

/// A conversation joined with its author, heading a thread view
#[derive(Debug, Clone, FromRow)]
pub struct ThreadHeaderRow {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_email: String,
    pub author_avatar: Option<String>,
}
