//! PostgreSQL implementation of the conversation repository traits

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::{Conversation, Message};
use forum_core::read_models::{ConversationListItem, ConversationThread};
use forum_core::traits::{
    CreateConversationRepository, DeleteConversationRepository, GetConversationByIdRepository,
    ListConversationsRepository, RepoResult, UpdateConversationRepository,
};

use crate::mappers::thread_from_rows;
use crate::models::{ConversationListRow, ConversationModel, ThreadHeaderRow, ThreadMessageRow};

use super::error::{conversation_not_found, map_db_error};

/// PostgreSQL implementation of the conversation repositories
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_active(&self, id: Uuid) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            r"
            SELECT id, author_id, title, created_at, updated_at, deleted_at
            FROM conversations
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }
}

#[async_trait]
impl CreateConversationRepository for PgConversationRepository {
    #[instrument(skip(self, conversation, first_message), fields(conversation_id = %conversation.id))]
    async fn create_with_first_message(
        &self,
        conversation: &Conversation,
        first_message: &Message,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO conversations (id, author_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(conversation.id)
        .bind(conversation.author_id)
        .bind(&conversation.title)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO messages (id, conversation_id, author_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(first_message.id)
        .bind(first_message.conversation_id)
        .bind(first_message.author_id)
        .bind(&first_message.content)
        .bind(first_message.created_at)
        .bind(first_message.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl UpdateConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>> {
        self.fetch_active(id).await
    }

    #[instrument(skip(self, conversation), fields(conversation_id = %conversation.id))]
    async fn update(&self, conversation: &Conversation) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE conversations
            SET title = $2, updated_at = $3
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(conversation.id)
        .bind(&conversation.title)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(conversation.id));
        }

        Ok(())
    }
}

#[async_trait]
impl DeleteConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>> {
        self.fetch_active(id).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE conversations
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }
}

#[async_trait]
impl ListConversationsRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn list_active(&self) -> RepoResult<Vec<ConversationListItem>> {
        let rows = sqlx::query_as::<_, ConversationListRow>(
            r"
            SELECT c.id, c.title, c.created_at, c.updated_at,
                   u.id AS author_id, u.name AS author_name, u.email AS author_email,
                   (SELECT COUNT(*) FROM messages m
                    WHERE m.conversation_id = c.id AND m.deleted_at IS NULL) AS message_count,
                   lm.id AS last_message_id,
                   lm.content AS last_message_content,
                   lm.created_at AS last_message_created_at,
                   lm.author_name AS last_message_author_name
            FROM conversations c
            INNER JOIN users u ON u.id = c.author_id
            LEFT JOIN LATERAL (
                SELECT m.id, m.content, m.created_at, mu.name AS author_name
                FROM messages m
                INNER JOIN users mu ON mu.id = m.author_id
                WHERE m.conversation_id = c.id AND m.deleted_at IS NULL
                ORDER BY m.created_at DESC
                LIMIT 1
            ) lm ON TRUE
            WHERE c.deleted_at IS NULL
            ORDER BY c.created_at DESC, c.id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ConversationListItem::from).collect())
    }
}

#[async_trait]
impl GetConversationByIdRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_thread(&self, id: Uuid) -> RepoResult<Option<ConversationThread>> {
        let header = sqlx::query_as::<_, ThreadHeaderRow>(
            r"
            SELECT c.id, c.title, c.author_id, c.created_at, c.updated_at,
                   u.name AS author_name, u.email AS author_email, u.avatar AS author_avatar
            FROM conversations c
            INNER JOIN users u ON u.id = c.author_id
            WHERE c.id = $1 AND c.deleted_at IS NULL
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(header) = header else {
            return Ok(None);
        };

        let messages = sqlx::query_as::<_, ThreadMessageRow>(
            r"
            SELECT m.id, m.content, m.author_id, m.created_at, m.updated_at,
                   u.name AS author_name, u.email AS author_email, u.avatar AS author_avatar
            FROM messages m
            INNER JOIN users u ON u.id = m.author_id
            WHERE m.conversation_id = $1 AND m.deleted_at IS NULL
            ORDER BY m.created_at ASC, m.id ASC
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Some(thread_from_rows(header, messages)))
    }
}
