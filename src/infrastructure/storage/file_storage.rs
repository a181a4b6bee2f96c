//! Token file in the application data directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::{TOKEN_STORAGE_KEY, TokenStoragePort};
use crate::infrastructure::config::storage::save_atomically;

/// Stores the token as the whole content of a single file.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Storage file `authToken` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TOKEN_STORAGE_KEY))
    }

    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStoragePort for FileTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(AuthToken::new(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "No token file");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, path = ?self.path, "Failed to read token file");
                Err(AuthError::retrieval_failed(e.to_string()))
            }
        }
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
        let path = self.path.clone();
        let content = token.as_str().as_bytes().to_vec();

        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            save_atomically(&path, &content)?;
            restrict_permissions(&path)
        })
        .await
        .map_err(|e| AuthError::unexpected(e.to_string()))?
        .map_err(|e| {
            warn!(error = %e, "Failed to write token file");
            AuthError::storage_failed(e.to_string())
        })?;

        debug!(path = ?self.path, "Token written");
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::storage_failed(e.to_string())),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_roundtrip_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileTokenStorage::in_dir(&dir.path().join("data"));
        let token = AuthToken::new_unchecked("mock_token_1_42");

        assert!(storage.get_token().await.unwrap().is_none());
        storage.store_token(&token).await.unwrap();
        assert_eq!(storage.get_token().await.unwrap(), Some(token));
        assert!(storage.path().ends_with("authToken"));

        storage.delete_token().await.unwrap();
        assert!(!storage.has_token().await.unwrap());
        storage.delete_token().await.unwrap();
    }

    #[tokio::test]
    async fn test_blank_file_is_no_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("authToken");
        std::fs::write(&path, "  \n").unwrap();

        let storage = FileTokenStorage::new(path);
        assert!(storage.get_token().await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let storage = FileTokenStorage::in_dir(dir.path());
        storage
            .store_token(&AuthToken::new_unchecked("t0k3n"))
            .await
            .unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
