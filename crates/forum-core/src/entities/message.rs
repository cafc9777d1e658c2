//! Message entity - a post inside a conversation

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

pub const CONTENT_MAX_LEN: usize = 2000;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new Message
    ///
    /// # Errors
    /// Returns a validation error for nil ids or invalid content
    pub fn new(
        id: Uuid,
        conversation_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Self, DomainError> {
        if conversation_id.is_nil() {
            return Err(DomainError::validation(
                "conversation_id",
                "Conversation is required",
            ));
        }
        if author_id.is_nil() {
            return Err(DomainError::validation("author_id", "Author is required"));
        }
        validate_content(content)?;

        let now = Utc::now();
        Ok(Self {
            id,
            conversation_id,
            author_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn is_author(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Edit the message content. Authorship never changes.
    ///
    /// # Errors
    /// Returns a validation error if the new content breaks a rule
    pub fn edit(&mut self, content: &str) -> Result<(), DomainError> {
        validate_content(content)?;
        self.content = content.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark as deleted
    pub fn delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("content", "Content is required"));
    }
    if content.chars().count() > CONTENT_MAX_LEN {
        return Err(DomainError::validation(
            "content",
            format!("Content cannot exceed {CONTENT_MAX_LEN} characters"),
        ));
    }
    Ok(())
}
