use async_trait::async_trait;
use uuid::Uuid;

use super::RepoResult;
use crate::entities::{Session, Verification, VerificationPurpose};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> RepoResult<()>;

    /// Returns revoked and expired sessions too; callers check `is_active`
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Session>>;

    /// Revoke every unrevoked session of a user, returning how many changed
    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64>;

    /// Same as `revoke_all_for_user` but leaves `keep` alone
    async fn revoke_all_except(&self, user_id: Uuid, keep: Uuid) -> RepoResult<u64>;
}

#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Store a new secret, consuming any earlier open one for the same user and purpose
    async fn create(&self, verification: &Verification) -> RepoResult<()>;

    /// The newest unconsumed verification for a user and purpose
    async fn find_latest_active(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> RepoResult<Option<Verification>>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Verification>>;

    /// Returns the attempt count after incrementing
    async fn increment_attempts(&self, id: Uuid) -> RepoResult<i32>;

    /// Mark as used; `InvalidToken` if it was already consumed
    async fn consume(&self, id: Uuid) -> RepoResult<()>;
}
