//! Profile, avatar, and public contribution use cases

use chrono::Utc;
use forum_core::read_models::{UserContributions, UserProfile};
use forum_core::value_objects::ProfileChanges;
use forum_core::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::AvatarResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Largest accepted avatar
pub const AVATAR_MAX_BYTES: usize = 2 * 1024 * 1024;

/// File extension for an accepted avatar MIME type
pub fn avatar_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

// ============================================================================
// Profile
// ============================================================================

pub struct GetMyProfile<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GetMyProfile<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<UserProfile> {
        self.ctx
            .repos()
            .my_profile
            .find_profile(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}

pub struct UpdateUserProfile<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UpdateUserProfile<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply a partial update; unset fields keep their value
    #[instrument(skip(self, changes))]
    pub async fn execute(&self, user_id: Uuid, changes: ProfileChanges) -> ServiceResult<UserProfile> {
        let repo = &self.ctx.repos().update_profile;

        let mut user = repo
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        // Validate the merged result before anything is written
        user.apply_profile_changes(changes.clone())?;

        if changes.is_empty() {
            return Ok(UserProfile {
                id: user.id,
                email: user.email,
                name: user.name,
                bio: user.bio,
                avatar: user.avatar,
            });
        }

        let profile = repo.update_profile(user_id, &changes).await?;

        info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }
}

// ============================================================================
// Avatar
// ============================================================================

#[derive(Clone)]
pub struct UpdateUserAvatarCommand {
    pub user_id: Uuid,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl std::fmt::Debug for UpdateUserAvatarCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserAvatarCommand")
            .field("user_id", &self.user_id)
            .field("size", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

pub struct UpdateUserAvatar<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UpdateUserAvatar<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check the file, store it, and point the profile at it
    #[instrument(skip(self, command), fields(user_id = %command.user_id, size = command.bytes.len()))]
    pub async fn execute(&self, command: UpdateUserAvatarCommand) -> ServiceResult<AvatarResponse> {
        let repo = &self.ctx.repos().update_avatar;

        if !repo.user_exists(command.user_id).await? {
            return Err(DomainError::UserNotFound(command.user_id).into());
        }

        if command.bytes.is_empty() {
            return Err(DomainError::validation("file", "File is required").into());
        }
        if command.bytes.len() > AVATAR_MAX_BYTES {
            return Err(DomainError::FileTooLarge {
                max_bytes: AVATAR_MAX_BYTES,
            }
            .into());
        }
        let extension = avatar_extension(&command.content_type)
            .ok_or_else(|| DomainError::UnsupportedFormat(command.content_type.clone()))?;

        let file_name = format!(
            "{}-{}.{extension}",
            command.user_id,
            Utc::now().timestamp_millis()
        );
        let avatar_url = self
            .ctx
            .avatar_storage()
            .upload(&command.bytes, &file_name, &command.content_type)
            .await?;

        repo.update_avatar(command.user_id, &avatar_url).await?;

        info!(user_id = %command.user_id, "Avatar updated");
        Ok(AvatarResponse { avatar_url })
    }
}

// ============================================================================
// Contributions
// ============================================================================

pub struct GetUserContributions<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GetUserContributions<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<UserContributions> {
        let repo = &self.ctx.repos().contributions;

        let user = repo
            .find_contributor(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        let conversations = repo.conversations_by_author(user_id).await?;
        let messages = repo.messages_by_author(user_id).await?;

        Ok(UserContributions {
            user,
            conversations,
            messages,
        })
    }
}
