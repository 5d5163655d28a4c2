use async_trait::async_trait;
use autonomo_core::AppResult;

/// Persisted slot holding the session bearer token.
///
/// Clearing an empty store succeeds.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    async fn load(&self) -> AppResult<Option<String>>;

    /// Replaces the stored token.
    async fn save(&self, token: &str) -> AppResult<()>;

    /// Removes the stored token.
    async fn clear(&self) -> AppResult<()>;
}
