use async_trait::async_trait;
use autonomo_application::TokenStore;
use autonomo_core::AppResult;
use tokio::sync::RwLock;

/// Process-local token store used when no file should be written.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> AppResult<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> AppResult<()> {
        *self.token.write().await = Some(token.to_owned());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.token.write().await = None;
        Ok(())
    }
}
