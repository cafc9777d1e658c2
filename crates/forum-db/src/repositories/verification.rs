//! PostgreSQL implementation of VerificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::{Verification, VerificationPurpose};
use forum_core::error::DomainError;
use forum_core::traits::{RepoResult, VerificationRepository};

use crate::models::VerificationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of VerificationRepository
#[derive(Clone)]
pub struct PgVerificationRepository {
    pool: PgPool,
}

impl PgVerificationRepository {
    /// Create a new PgVerificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationRepository for PgVerificationRepository {
    #[instrument(skip(self, verification), fields(user_id = %verification.user_id, purpose = %verification.purpose))]
    async fn create(&self, verification: &Verification) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Only the newest secret per user and purpose stays redeemable
        sqlx::query(
            r"
            UPDATE verifications
            SET consumed_at = NOW()
            WHERE user_id = $1 AND purpose = $2 AND consumed_at IS NULL
            ",
        )
        .bind(verification.user_id)
        .bind(verification.purpose.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO verifications (id, user_id, purpose, secret_hash, expires_at, attempts, consumed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(verification.id)
        .bind(verification.user_id)
        .bind(verification.purpose.as_str())
        .bind(&verification.secret_hash)
        .bind(verification.expires_at)
        .bind(verification.attempts)
        .bind(verification.consumed_at)
        .bind(verification.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_latest_active(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> RepoResult<Option<Verification>> {
        let result = sqlx::query_as::<_, VerificationModel>(
            r"
            SELECT id, user_id, purpose, secret_hash, expires_at, attempts, consumed_at, created_at
            FROM verifications
            WHERE user_id = $1 AND purpose = $2 AND consumed_at IS NULL
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Verification::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Verification>> {
        let result = sqlx::query_as::<_, VerificationModel>(
            r"
            SELECT id, user_id, purpose, secret_hash, expires_at, attempts, consumed_at, created_at
            FROM verifications
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Verification::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn increment_attempts(&self, id: Uuid) -> RepoResult<i32> {
        let attempts = sqlx::query_scalar::<_, i32>(
            r"
            UPDATE verifications
            SET attempts = attempts + 1
            WHERE id = $1
            RETURNING attempts
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        attempts.ok_or(DomainError::InvalidToken)
    }

    #[instrument(skip(self))]
    async fn consume(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE verifications
            SET consumed_at = NOW()
            WHERE id = $1 AND consumed_at IS NULL
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        // A concurrent redemption already used it
        if result.rows_affected() == 0 {
            return Err(DomainError::InvalidToken);
        }

        Ok(())
    }
}
