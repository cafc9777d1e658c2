use async_trait::async_trait;
use uuid::Uuid;

use super::RepoResult;
use crate::entities::{Conversation, Message};
use crate::read_models::{ConversationListItem, ConversationThread};

#[async_trait]
pub trait CreateConversationRepository: Send + Sync {
    /// Persist a conversation and its opening message as one unit
    async fn create_with_first_message(
        &self,
        conversation: &Conversation,
        first_message: &Message,
    ) -> RepoResult<()>;
}

#[async_trait]
pub trait UpdateConversationRepository: Send + Sync {
    /// Soft-deleted conversations are reported as `None`
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>>;

    async fn update(&self, conversation: &Conversation) -> RepoResult<()>;
}

#[async_trait]
pub trait DeleteConversationRepository: Send + Sync {
    /// Soft-deleted conversations are reported as `None`
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>>;

    /// Soft delete; `ConversationNotFound` if already deleted
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait ListConversationsRepository: Send + Sync {
    /// Non-deleted conversations, newest first
    async fn list_active(&self) -> RepoResult<Vec<ConversationListItem>>;
}

#[async_trait]
pub trait GetConversationByIdRepository: Send + Sync {
    async fn find_thread(&self, id: Uuid) -> RepoResult<Option<ConversationThread>>;
}
