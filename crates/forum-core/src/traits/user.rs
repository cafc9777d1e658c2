use async_trait::async_trait;
use uuid::Uuid;

use super::RepoResult;
use crate::entities::User;
use crate::read_models::{
    ContributionUser, ConversationContribution, MessageContribution, UserProfile,
};
use crate::value_objects::ProfileChanges;

#[async_trait]
pub trait RegisterUserRepository: Send + Sync {
    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Insert a user whose password is already hashed
    ///
    /// Fails with `DuplicateEmail` if the address was taken concurrently.
    async fn save(&self, user: &User) -> RepoResult<()>;
}

#[async_trait]
pub trait SignInRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait GetMyProfileRepository: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> RepoResult<Option<UserProfile>>;
}

#[async_trait]
pub trait UpdateUserProfileRepository: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>>;

    /// Apply only the fields that are not `Unset`
    ///
    /// Fails with `UserNotFound` if the row is gone.
    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> RepoResult<UserProfile>;
}

#[async_trait]
pub trait UpdateUserAvatarRepository: Send + Sync {
    async fn user_exists(&self, user_id: Uuid) -> RepoResult<bool>;

    async fn update_avatar(&self, user_id: Uuid, avatar_url: &str) -> RepoResult<()>;
}

#[async_trait]
pub trait UpdatePasswordRepository: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>>;

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> RepoResult<()>;
}

#[async_trait]
pub trait GetUserContributionsRepository: Send + Sync {
    async fn find_contributor(&self, user_id: Uuid) -> RepoResult<Option<ContributionUser>>;

    /// Non-deleted conversations, newest first
    async fn conversations_by_author(
        &self,
        user_id: Uuid,
    ) -> RepoResult<Vec<ConversationContribution>>;

    /// Non-deleted messages in non-deleted conversations, newest first
    async fn messages_by_author(&self, user_id: Uuid) -> RepoResult<Vec<MessageContribution>>;
}

#[async_trait]
pub trait EmailVerificationRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn mark_email_verified(&self, user_id: Uuid) -> RepoResult<()>;
}
