//! Verification model <-> entity mapper

use forum_core::entities::{Verification, VerificationPurpose};
use forum_core::error::DomainError;

use crate::models::VerificationModel;

impl TryFrom<VerificationModel> for Verification {
    type Error = DomainError;

    fn try_from(model: VerificationModel) -> Result<Self, Self::Error> {
        Ok(Verification {
            id: model.id,
            user_id: model.user_id,
            purpose: VerificationPurpose::parse(&model.purpose)?,
            secret_hash: model.secret_hash,
            expires_at: model.expires_at,
            attempts: model.attempts,
            consumed_at: model.consumed_at,
            created_at: model.created_at,
        })
    }
}
