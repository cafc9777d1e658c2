//! Conversation entity - a discussion thread opened by a user

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 200;

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Create a new Conversation
    ///
    /// # Errors
    /// Returns a validation error for a nil author or an invalid title
    pub fn new(id: Uuid, author_id: Uuid, title: &str) -> Result<Self, DomainError> {
        if author_id.is_nil() {
            return Err(DomainError::validation("author_id", "Author is required"));
        }
        let title = validate_title(title)?;

        let now = Utc::now();
        Ok(Self {
            id,
            author_id,
            title,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Check if the conversation has been soft-deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if the given user opened this conversation
    #[inline]
    pub fn is_author(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Replace the title
    ///
    /// # Errors
    /// Returns a validation error if the new title breaks a rule
    pub fn update_title(&mut self, title: &str) -> Result<(), DomainError> {
        self.title = validate_title(title)?;
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

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("title", "Title is required"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::validation(
            "title",
            format!("Title cannot exceed {TITLE_MAX_LEN} characters"),
        ));
    }
    Ok(title.to_string())
}
