use async_trait::async_trait;
use autonomo_core::AppResult;
use autonomo_domain::{CreateUserInput, TokenResponse, User};

/// Port for the authentication REST resource.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse>;

    /// Exchanges a Google ID token for a bearer token.
    async fn login_with_google(&self, id_token: &str) -> AppResult<TokenResponse>;

    /// Returns the profile behind the current bearer token.
    async fn current_user(&self) -> AppResult<User>;

    /// Creates an account.
    async fn register(&self, input: &CreateUserInput) -> AppResult<User>;
}
