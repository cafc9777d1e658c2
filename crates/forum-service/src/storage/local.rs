use std::path::PathBuf;

use async_trait::async_trait;
use forum_core::DomainError;
use tokio::fs;
use tracing::{info, instrument};

use super::AvatarStorage;

/// Writes avatars to `{upload_dir}/avatars/{file_name}`.
///
/// The API serves that directory under `/avatars`, so the returned URL is
/// `{public_base_url}/avatars/{file_name}`.
#[derive(Debug, Clone)]
pub struct LocalAvatarStorage {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalAvatarStorage {
    pub fn new(upload_dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: upload_dir.into().join("avatars"),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory the files land in
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn file_path(&self, file_name: &str) -> Result<PathBuf, DomainError> {
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name.starts_with('.')
        {
            return Err(DomainError::Storage(format!(
                "Refusing file name {file_name:?}"
            )));
        }
        Ok(self.dir.join(file_name))
    }
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        bytes: &[u8],
        file_name: &str,
        content_type: &str,
    ) -> Result<String, DomainError> {
        let path = self.file_path(file_name)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        info!(path = %path.display(), "Avatar stored");

        Ok(format!("{}/avatars/{file_name}", self.public_base_url))
    }
}
