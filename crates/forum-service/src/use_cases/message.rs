//! Message use cases

use forum_core::entities::Message;
use forum_core::DomainError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{CreateMessageResponse, SuccessResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

#[derive(Debug, Clone)]
pub struct CreateMessageCommand {
    pub conversation_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
}

pub struct CreateMessage<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CreateMessage<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reply in a live conversation
    #[instrument(skip(self, command), fields(conversation_id = %command.conversation_id))]
    pub async fn execute(&self, command: CreateMessageCommand) -> ServiceResult<CreateMessageResponse> {
        let repo = &self.ctx.repos().create_message;

        if !repo.conversation_exists(command.conversation_id).await? {
            return Err(DomainError::ConversationNotFound(command.conversation_id).into());
        }

        let message = Message::new(
            Uuid::new_v4(),
            command.conversation_id,
            command.author_id,
            &command.content,
        )?;
        repo.save(&message).await?;

        info!(message_id = %message.id, "Message created");
        Ok(CreateMessageResponse {
            message_id: message.id,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UpdateMessageCommand {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

pub struct UpdateMessage<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UpdateMessage<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, command), fields(message_id = %command.message_id))]
    pub async fn execute(&self, command: UpdateMessageCommand) -> ServiceResult<SuccessResponse> {
        let repo = &self.ctx.repos().update_message;

        let mut message = repo
            .find_by_id(command.message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(command.message_id))?;

        if !message.is_author(command.user_id) {
            warn!(user_id = %command.user_id, "Message edit refused: not the author");
            return Err(DomainError::forbidden("Only the author can edit this message").into());
        }

        message.edit(&command.content)?;
        repo.update(&message).await?;

        info!(message_id = %message.id, "Message updated");
        Ok(SuccessResponse::ok())
    }
}

pub struct DeleteMessage<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DeleteMessage<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Soft delete; a second call reports not found
    #[instrument(skip(self))]
    pub async fn execute(&self, message_id: Uuid, user_id: Uuid) -> ServiceResult<SuccessResponse> {
        let repo = &self.ctx.repos().delete_message;

        let message = repo
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if !message.is_author(user_id) {
            warn!(user_id = %user_id, "Message delete refused: not the author");
            return Err(DomainError::forbidden("Only the author can delete this message").into());
        }

        repo.delete(message_id).await?;

        info!(message_id = %message_id, "Message deleted");
        Ok(SuccessResponse::ok())
    }
}
