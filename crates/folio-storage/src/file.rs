//! File-backed secret provider.
//!
//! The secret is stored as the bare base32 string, nothing else, in a file
//! readable and writable by the owner only. An empty file counts as "no
//! secret yet" so an operator can pre-create the file with the right
//! ownership.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{StorageError, StorageResult};
use crate::secret::{SecretProvider, SecretRecord};

/// Permission bits for the secret file.
#[cfg(unix)]
const SECRET_FILE_MODE: u32 = 0o600;

/// Stores the OTP secret in a single file.
#[derive(Debug, Clone)]
pub struct FileSecretProvider {
    path: PathBuf,
}

impl FileSecretProvider {
    /// Creates a provider for the secret file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the secret file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_trimmed(&self) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let trimmed = content.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(StorageError::InvalidData(
                format!("{} is not valid UTF-8", self.path.display()),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SecretProvider for FileSecretProvider {
    async fn get(&self) -> StorageResult<Option<SecretRecord>> {
        Ok(self.read_trimmed().await?.map(SecretRecord::new))
    }

    async fn insert(&self, record: &SecretRecord) -> StorageResult<()> {
        if self.read_trimmed().await?.is_some() {
            return Err(StorageError::AlreadyExists("OTP secret"));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(SECRET_FILE_MODE);

        let mut file = options.open(&self.path).await?;

        // `mode` only applies when the file is created; tighten a
        // pre-existing empty file as well.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(SECRET_FILE_MODE);
            tokio::fs::set_permissions(&self.path, perms).await?;
        }

        file.write_all(record.otp_key.as_bytes()).await?;
        file.sync_all().await?;

        tracing::debug!(path = %self.path.display(), "OTP secret written");
        Ok(())
    }
}
