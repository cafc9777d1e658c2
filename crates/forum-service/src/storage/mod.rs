//! Avatar byte storage

mod local;

use async_trait::async_trait;
use forum_core::DomainError;

pub use local::LocalAvatarStorage;

#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Store the bytes under `file_name` and return the public URL
    ///
    /// # Errors
    /// Returns `DomainError::Storage` when the bytes cannot be written
    async fn upload(
        &self,
        bytes: &[u8],
        file_name: &str,
        content_type: &str,
    ) -> Result<String, DomainError>;
}
