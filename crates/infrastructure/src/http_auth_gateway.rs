use async_trait::async_trait;
use autonomo_application::AuthGateway;
use autonomo_core::AppResult;
use autonomo_domain::{CreateUserInput, TokenResponse, User};
use serde::Serialize;

use crate::api_client::ApiClient;

#[derive(Debug, Serialize)]
struct GoogleLoginRequest<'a> {
    token: &'a str,
}

/// REST implementation of the authentication resource.
#[derive(Clone)]
pub struct HttpAuthGateway {
    client: ApiClient,
}

impl HttpAuthGateway {
    /// Creates a new authentication gateway.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        self.client
            .post_form(
                &["auth", "token"],
                &[("username", username), ("password", password)],
            )
            .await
    }

    async fn login_with_google(&self, id_token: &str) -> AppResult<TokenResponse> {
        self.client
            .post_json(&["auth", "google"], &GoogleLoginRequest { token: id_token })
            .await
    }

    async fn current_user(&self) -> AppResult<User> {
        self.client.get(&["auth", "me"], &[]).await
    }

    async fn register(&self, input: &CreateUserInput) -> AppResult<User> {
        self.client.post_json(&["users", ""], input).await
    }
}
