use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use autonomo_application::TokenStore;
use autonomo_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Token store persisting `{"token": "..."}` to one JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AppResult<Option<String>> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read token file '{}': {error}",
                    self.path.display()
                )));
            }
        };

        let stored = serde_json::from_slice::<StoredToken>(&contents).map_err(|error| {
            AppError::Decode(format!(
                "token file '{}' is not valid: {error}",
                self.path.display()
            ))
        })?;

        Ok(Some(stored.token).filter(|token| !token.trim().is_empty()))
    }

    async fn save(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create token directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let contents = serde_json::to_vec(&StoredToken {
            token: token.to_owned(),
        })
        .map_err(|error| AppError::Internal(format!("failed to encode token: {error}")))?;

        tokio::fs::write(&self.path, contents).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write token file '{}': {error}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "token stored");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "token removed");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove token file '{}': {error}",
                self.path.display()
            ))),
        }
    }
}
