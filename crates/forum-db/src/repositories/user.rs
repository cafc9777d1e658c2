//! PostgreSQL implementation of the user-facing repository traits

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::User;
use forum_core::error::DomainError;
use forum_core::read_models::{
    ContributionUser, ConversationContribution, MessageContribution, UserProfile,
};
use forum_core::traits::{
    EmailVerificationRepository, GetMyProfileRepository, GetUserContributionsRepository,
    RegisterUserRepository, RepoResult, SignInRepository, UpdatePasswordRepository,
    UpdateUserAvatarRepository, UpdateUserProfileRepository,
};
use forum_core::value_objects::{Patch, ProfileChanges};

use crate::models::{
    ContributionUserRow, ConversationContributionRow, MessageContributionRow, UserModel,
    UserProfileRow,
};

use super::error::{map_db_error, map_unique_violation, user_not_found};

/// PostgreSQL implementation of the user repositories
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, email, password_hash, name, bio, avatar, email_verified,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    async fn fetch_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, email, password_hash, name, bio, avatar, email_verified,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }
}

/// Split a patch into "touch this column" and the new value
fn patch_binds(patch: &Patch<String>) -> (bool, Option<&str>) {
    match patch {
        Patch::Unset => (false, None),
        Patch::Clear => (true, None),
        Patch::Set(value) => (true, Some(value.as_str())),
    }
}

#[async_trait]
impl RegisterUserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            ",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn save(&self, user: &User) -> RepoResult<()> {
        if !user.has_hashed_password() {
            return Err(DomainError::Internal(
                "Refusing to store an unhashed password".to_string(),
            ));
        }

        sqlx::query(
            r"
            INSERT INTO users (id, email, password_hash, name, bio, avatar, email_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.password())
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.avatar)
        .bind(user.email_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateEmail))?;

        Ok(())
    }
}

#[async_trait]
impl SignInRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.fetch_by_email(email).await
    }
}

#[async_trait]
impl GetMyProfileRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_profile(&self, user_id: Uuid) -> RepoResult<Option<UserProfile>> {
        let result = sqlx::query_as::<_, UserProfileRow>(
            r"
            SELECT id, email, name, bio, avatar
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UserProfile::from))
    }
}

#[async_trait]
impl UpdateUserProfileRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>> {
        self.fetch_by_id(user_id).await
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> RepoResult<UserProfile> {
        let (touch_name, name) = patch_binds(&changes.name);
        let (touch_bio, bio) = patch_binds(&changes.bio);

        let result = sqlx::query_as::<_, UserProfileRow>(
            r"
            UPDATE users
            SET name = CASE WHEN $2 THEN $3 ELSE name END,
                bio = CASE WHEN $4 THEN $5 ELSE bio END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, bio, avatar
            ",
        )
        .bind(user_id)
        .bind(touch_name)
        .bind(name)
        .bind(touch_bio)
        .bind(bio)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result
            .map(UserProfile::from)
            .ok_or_else(|| user_not_found(user_id))
    }
}

#[async_trait]
impl UpdateUserAvatarRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn user_exists(&self, user_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            ",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn update_avatar(&self, user_id: Uuid, avatar_url: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET avatar = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .bind(avatar_url)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }

        Ok(())
    }
}

#[async_trait]
impl UpdatePasswordRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>> {
        self.fetch_by_id(user_id).await
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }

        Ok(())
    }
}

#[async_trait]
impl GetUserContributionsRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_contributor(&self, user_id: Uuid) -> RepoResult<Option<ContributionUser>> {
        let result = sqlx::query_as::<_, ContributionUserRow>(
            r"
            SELECT id, name, avatar, bio, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ContributionUser::from))
    }

    #[instrument(skip(self))]
    async fn conversations_by_author(
        &self,
        user_id: Uuid,
    ) -> RepoResult<Vec<ConversationContribution>> {
        let rows = sqlx::query_as::<_, ConversationContributionRow>(
            r"
            SELECT c.id, c.title, c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM messages m
                    WHERE m.conversation_id = c.id AND m.deleted_at IS NULL) AS message_count
            FROM conversations c
            WHERE c.author_id = $1 AND c.deleted_at IS NULL
            ORDER BY c.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ConversationContribution::from).collect())
    }

    #[instrument(skip(self))]
    async fn messages_by_author(&self, user_id: Uuid) -> RepoResult<Vec<MessageContribution>> {
        let rows = sqlx::query_as::<_, MessageContributionRow>(
            r"
            SELECT m.id, m.content, m.created_at, m.updated_at,
                   m.conversation_id, c.title AS conversation_title
            FROM messages m
            INNER JOIN conversations c ON c.id = m.conversation_id
            WHERE m.author_id = $1 AND m.deleted_at IS NULL AND c.deleted_at IS NULL
            ORDER BY m.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(MessageContribution::from).collect())
    }
}

#[async_trait]
impl EmailVerificationRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.fetch_by_email(email).await
    }

    #[instrument(skip(self))]
    async fn mark_email_verified(&self, user_id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET email_verified = TRUE, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }

        Ok(())
    }
}
