//! User database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns exposed to the account owner
#[derive(Debug, Clone, FromRow)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Columns exposed on a public contributions page
#[derive(Debug, Clone, FromRow)]
pub struct ContributionUserRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}
