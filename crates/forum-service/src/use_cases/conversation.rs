//! Conversation use cases

use forum_core::entities::{Conversation, Message};
use forum_core::read_models::{ConversationListItem, ConversationThread};
use forum_core::DomainError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{CreateConversationResponse, SuccessResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

// ============================================================================
// Create
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateConversationCommand {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
}

pub struct CreateConversation<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CreateConversation<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open a conversation together with its first message
    #[instrument(skip(self, command), fields(author_id = %command.author_id))]
    pub async fn execute(
        &self,
        command: CreateConversationCommand,
    ) -> ServiceResult<CreateConversationResponse> {
        let conversation = Conversation::new(Uuid::new_v4(), command.author_id, &command.title)?;
        let message = Message::new(
            Uuid::new_v4(),
            conversation.id,
            command.author_id,
            &command.content,
        )?;

        self.ctx
            .repos()
            .create_conversation
            .create_with_first_message(&conversation, &message)
            .await?;

        info!(conversation_id = %conversation.id, "Conversation created");

        Ok(CreateConversationResponse {
            conversation_id: conversation.id,
            message_id: message.id,
        })
    }
}

// ============================================================================
// Update
// ============================================================================

#[derive(Debug, Clone)]
pub struct UpdateConversationCommand {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
}

pub struct UpdateConversation<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UpdateConversation<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, command), fields(conversation_id = %command.conversation_id))]
    pub async fn execute(&self, command: UpdateConversationCommand) -> ServiceResult<SuccessResponse> {
        let repo = &self.ctx.repos().update_conversation;

        let mut conversation = repo
            .find_by_id(command.conversation_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(command.conversation_id))?;

        if !conversation.is_author(command.user_id) {
            warn!(user_id = %command.user_id, "Conversation update refused: not the author");
            return Err(DomainError::forbidden("Only the author can edit this conversation").into());
        }

        conversation.update_title(&command.title)?;
        repo.update(&conversation).await?;

        info!(conversation_id = %conversation.id, "Conversation updated");
        Ok(SuccessResponse::ok())
    }
}

// ============================================================================
// Delete
// ============================================================================

pub struct DeleteConversation<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DeleteConversation<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Soft delete; a second call reports not found
    #[instrument(skip(self))]
    pub async fn execute(&self, conversation_id: Uuid, user_id: Uuid) -> ServiceResult<SuccessResponse> {
        let repo = &self.ctx.repos().delete_conversation;

        let conversation = repo
            .find_by_id(conversation_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;

        if !conversation.is_author(user_id) {
            warn!(user_id = %user_id, "Conversation delete refused: not the author");
            return Err(
                DomainError::forbidden("Only the author can delete this conversation").into(),
            );
        }

        repo.delete(conversation_id).await?;

        info!(conversation_id = %conversation_id, "Conversation deleted");
        Ok(SuccessResponse::ok())
    }
}

// ============================================================================
// Read
// ============================================================================

pub struct ListConversations<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ListConversations<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> ServiceResult<Vec<ConversationListItem>> {
        Ok(self.ctx.repos().list_conversations.list_active().await?)
    }
}

pub struct GetConversationById<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GetConversationById<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, conversation_id: Uuid) -> ServiceResult<ConversationThread> {
        self.ctx
            .repos()
            .get_conversation
            .find_thread(conversation_id)
            .await?
            .ok_or_else(|| DomainError::ConversationNotFound(conversation_id).into())
    }
}
