//! User handlers
//!
//! Profile, avatar, password and public contributions.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use forum_core::{DomainError, UserContributions, UserProfile};
use forum_service::dto::{
    AvatarResponse, UpdatePasswordRequest, UpdatePasswordResponse, UpdateProfileRequest,
};
use forum_service::use_cases::{
    GetMyProfile, GetUserContributions, UpdatePassword, UpdateUserAvatar,
    UpdateUserAvatarCommand, UpdateUserProfile, AVATAR_MAX_BYTES,
};

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Name of the multipart part carrying the image
const AVATAR_FIELD: &str = "file";

/// GET /users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = GetMyProfile::new(state.service_context())
        .execute(auth.user_id)
        .await?;
    Ok(Json(profile))
}

/// PATCH /users/profile
///
/// Absent fields stay as they are, `null` clears them.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UpdateUserProfile::new(state.service_context())
        .execute(auth.user_id, request.into())
        .await?;
    Ok(Json(profile))
}

/// PATCH /users/profile/avatar
///
/// `multipart/form-data` with the image in a `file` part.
pub async fn update_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AvatarResponse>> {
    let mut multipart = multipart.map_err(|e| ApiError::invalid_body(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((bytes, content_type));
        break;
    }

    let Some((bytes, content_type)) = upload else {
        return Err(DomainError::validation("file", "An image file is required").into());
    };

    let response = UpdateUserAvatar::new(state.service_context())
        .execute(UpdateUserAvatarCommand {
            user_id: auth.user_id,
            bytes: bytes.to_vec(),
            content_type,
        })
        .await?;
    Ok(Json(response))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DomainError::FileTooLarge {
            max_bytes: AVATAR_MAX_BYTES,
        }
        .into()
    } else {
        ApiError::invalid_body(e.body_text())
    }
}

/// PATCH /users/profile/password
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdatePasswordRequest>,
) -> ApiResult<Json<UpdatePasswordResponse>> {
    let response = UpdatePassword::new(state.service_context())
        .execute(request.into_command(auth.user_id, auth.session_id))
        .await?;
    Ok(Json(response))
}

/// GET /users/{id}/contributions
pub async fn get_contributions(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<UserContributions>> {
    let contributions = GetUserContributions::new(state.service_context())
        .execute(user_id)
        .await?;
    Ok(Json(contributions))
}
