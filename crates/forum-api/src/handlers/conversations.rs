//! Conversation handlers

use axum::{extract::State, Json};
use forum_core::{ConversationListItem, ConversationThread};
use forum_service::dto::{
    CreateConversationRequest, CreateConversationResponse, CreateMessageResponse,
    MessageContentRequest, SuccessResponse, UpdateConversationRequest,
};
use forum_service::use_cases::{
    CreateConversation, CreateMessage, DeleteConversation, GetConversationById,
    ListConversations, UpdateConversation,
};

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// GET /conversations
///
/// Live conversations, newest first.
pub async fn list_conversations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ConversationListItem>>> {
    let conversations = ListConversations::new(state.service_context())
        .execute()
        .await?;
    Ok(Json(conversations))
}

/// POST /conversations
pub async fn create_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateConversationRequest>,
) -> ApiResult<Created<Json<CreateConversationResponse>>> {
    let response = CreateConversation::new(state.service_context())
        .execute(request.into_command(auth.user_id))
        .await?;
    Ok(Created(Json(response)))
}

/// GET /conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    IdPath(conversation_id): IdPath,
) -> ApiResult<Json<ConversationThread>> {
    let thread = GetConversationById::new(state.service_context())
        .execute(conversation_id)
        .await?;
    Ok(Json(thread))
}

/// PATCH /conversations/{id}
pub async fn update_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateConversationRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = UpdateConversation::new(state.service_context())
        .execute(request.into_command(conversation_id, auth.user_id))
        .await?;
    Ok(Json(response))
}

/// DELETE /conversations/{id}
pub async fn delete_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath,
) -> ApiResult<Json<SuccessResponse>> {
    let response = DeleteConversation::new(state.service_context())
        .execute(conversation_id, auth.user_id)
        .await?;
    Ok(Json(response))
}

/// POST /conversations/{id}/messages
pub async fn reply_to_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath,
    ValidatedJson(request): ValidatedJson<MessageContentRequest>,
) -> ApiResult<Created<Json<CreateMessageResponse>>> {
    let response = CreateMessage::new(state.service_context())
        .execute(request.into_create_command(conversation_id, auth.user_id))
        .await?;
    Ok(Created(Json(response)))
}
