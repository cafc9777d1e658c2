use async_trait::async_trait;
use uuid::Uuid;

use super::RepoResult;
use crate::entities::Message;

#[async_trait]
pub trait CreateMessageRepository: Send + Sync {
    /// True only for an existing, non-deleted conversation
    async fn conversation_exists(&self, conversation_id: Uuid) -> RepoResult<bool>;

    async fn save(&self, message: &Message) -> RepoResult<()>;
}

#[async_trait]
pub trait UpdateMessageRepository: Send + Sync {
    /// Soft-deleted messages are reported as `None`
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>>;

    async fn update(&self, message: &Message) -> RepoResult<()>;
}

#[async_trait]
pub trait DeleteMessageRepository: Send + Sync {
    /// Soft-deleted messages are reported as `None`
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>>;

    /// Soft delete; `MessageNotFound` if already deleted
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}
