//! Session lifecycle: sign-in, sign-out and the local authentication check.

use std::sync::Arc;

use autonomo_core::{AppResult, NonEmptyString};
use autonomo_domain::{CreateUserInput, TokenResponse, TokenStatus, User, inspect_token};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::feedback::{report_failure, settle};
use crate::ports::{AuthGateway, Notifier, TokenStore};

const LOGIN_FALLBACK: &str = "Erro ao fazer login";
const GOOGLE_LOGIN_FALLBACK: &str = "Erro ao fazer login com Google";
const REGISTER_FALLBACK: &str = "Erro ao criar conta";
const CURRENT_USER_FALLBACK: &str = "Erro ao carregar dados do usuário";

/// Signs operators in and out and keeps the bearer token in the token store.
#[derive(Clone)]
pub struct SessionService {
    auth: Arc<dyn AuthGateway>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl SessionService {
    /// Creates a new session service.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            tokens,
            notifier,
        }
    }

    /// Exchanges email and password for a session.
    pub async fn login(&self, username: &str, password: &str) -> Option<User> {
        let result = async {
            let username = NonEmptyString::new(username.trim())?;
            let password = NonEmptyString::new(password)?;
            self.auth
                .login(username.as_str(), password.as_str())
                .await
        }
        .await;

        self.start_session("session.login", result, LOGIN_FALLBACK)
            .await
    }

    /// Exchanges a Google ID token for a session.
    pub async fn login_with_google(&self, id_token: &str) -> Option<User> {
        let result = async {
            let id_token = NonEmptyString::new(id_token.trim())?;
            self.auth.login_with_google(id_token.as_str()).await
        }
        .await;

        self.start_session("session.login_google", result, GOOGLE_LOGIN_FALLBACK)
            .await
    }

    async fn start_session(
        &self,
        operation: &'static str,
        result: AppResult<TokenResponse>,
        fallback: &str,
    ) -> Option<User> {
        let response = settle(self.notifier.as_ref(), operation, result, fallback)?;

        if let Err(failure) = self.tokens.save(&response.access_token).await {
            report_failure(self.notifier.as_ref(), operation, &failure, fallback);
            return None;
        }

        info!(user_id = response.user.id, email = %response.user.email, "session started");
        self.notifier.success("Login realizado com sucesso");
        Some(response.user)
    }

    /// Creates an account. The new account is not signed in.
    pub async fn register(&self, input: CreateUserInput) -> Option<User> {
        let result = async {
            let input = input.validated()?;
            self.auth.register(&input).await
        }
        .await;

        let user = settle(
            self.notifier.as_ref(),
            "session.register",
            result,
            REGISTER_FALLBACK,
        )?;
        info!(user_id = user.id, "account registered");
        self.notifier.success("Conta criada com sucesso");
        Some(user)
    }

    /// Returns the profile behind the stored token.
    pub async fn current_user(&self) -> Option<User> {
        let result = self.auth.current_user().await;
        settle(
            self.notifier.as_ref(),
            "session.current_user",
            result,
            CURRENT_USER_FALLBACK,
        )
    }

    /// Drops the stored token. Signing out without a session succeeds.
    pub async fn logout(&self) {
        if let Err(error) = self.tokens.clear().await {
            warn!(error = %error, "failed to clear stored token");
        }

        info!("session ended");
        self.notifier.success("Logout realizado com sucesso");
    }

    /// Returns whether a usable token is stored.
    ///
    /// Expired and malformed tokens are removed from the store.
    pub async fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        let token = match self.tokens.load().await {
            Ok(Some(token)) => token,
            Ok(None) => return false,
            Err(error) => {
                warn!(error = %error, "failed to read stored token");
                return false;
            }
        };

        let status = inspect_token(&token, now);
        if let TokenStatus::Valid { expires_at } = status {
            debug!(%expires_at, "stored token is valid");
            return true;
        }

        debug!(?status, "removing unusable stored token");
        if let Err(error) = self.tokens.clear().await {
            warn!(error = %error, "failed to clear unusable token");
        }
        false
    }
}

#[cfg(test)]
mod tests;
