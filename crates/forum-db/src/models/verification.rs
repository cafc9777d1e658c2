//! Verification database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for verifications table
#[derive(Debug, Clone, FromRow)]
pub struct VerificationModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub purpose: String,
    pub secret_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
