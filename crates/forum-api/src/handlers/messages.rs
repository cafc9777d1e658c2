//! Message handlers

use axum::{extract::State, Json};
use forum_service::dto::{
    CreateMessageRequest, CreateMessageResponse, MessageContentRequest, SuccessResponse,
};
use forum_service::use_cases::{CreateMessage, DeleteMessage, UpdateMessage};

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<Created<Json<CreateMessageResponse>>> {
    let response = CreateMessage::new(state.service_context())
        .execute(request.into_command(auth.user_id))
        .await?;
    Ok(Created(Json(response)))
}

/// PATCH /messages/{id}
pub async fn update_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath,
    ValidatedJson(request): ValidatedJson<MessageContentRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = UpdateMessage::new(state.service_context())
        .execute(request.into_update_command(message_id, auth.user_id))
        .await?;
    Ok(Json(response))
}

/// DELETE /messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath,
) -> ApiResult<Json<SuccessResponse>> {
    let response = DeleteMessage::new(state.service_context())
        .execute(message_id, auth.user_id)
        .await?;
    Ok(Json(response))
}
