//! PostgreSQL implementation of SessionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::Session;
use forum_core::traits::{RepoResult, SessionRepository};

use crate::models::SessionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SessionRepository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
    async fn create(&self, session: &Session) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO sessions (id, user_id, expires_at, created_at, revoked_at, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.revoked_at)
        .bind(&session.user_agent)
        .bind(&session.ip_address)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Session>> {
        let result = sqlx::query_as::<_, SessionModel>(
            r"
            SELECT id, user_id, expires_at, created_at, revoked_at, user_agent, ip_address
            FROM sessions
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Session::from))
    }

    #[instrument(skip(self))]
    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE user_id = $1 AND revoked_at IS NULL
            ",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn revoke_all_except(&self, user_id: Uuid, keep: Uuid) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE user_id = $1 AND id <> $2 AND revoked_at IS NULL
            ",
        )
        .bind(user_id)
        .bind(keep)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
