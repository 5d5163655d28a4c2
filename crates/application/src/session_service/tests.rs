use std::sync::Arc;

use async_trait::async_trait;
use autonomo_core::{AppError, AppResult};
use autonomo_domain::{CreateUserInput, TokenResponse, User};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::ports::{AuthGateway, TokenStore};
use crate::test_support::{RecordingNotifier, Toast};

use super::SessionService;

fn admin() -> User {
    User {
        id: 1,
        email: "admin@autonomo.app".to_owned(),
        name: "Admin".to_owned(),
        role: Some("MASTER".to_owned()),
        is_active: true,
        created_at: None,
    }
}

fn token_expiring_in(offset: Duration) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"sub":"admin@autonomo.app","exp":{}}}"#,
        (Utc::now() + offset).timestamp()
    ));
    format!("{header}.{payload}.signature")
}

#[derive(Default)]
struct FakeAuthGateway {
    reject_login: bool,
    logins: Mutex<Vec<(String, String)>>,
    registrations: Mutex<Vec<CreateUserInput>>,
}

#[async_trait]
impl AuthGateway for FakeAuthGateway {
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        self.logins
            .lock()
            .await
            .push((username.to_owned(), password.to_owned()));
        if self.reject_login {
            return Err(AppError::Api {
                status: 401,
                detail: Some("Email ou senha incorretos".to_owned()),
            });
        }
        Ok(TokenResponse {
            access_token: "issued-token".to_owned(),
            token_type: "bearer".to_owned(),
            user: admin(),
        })
    }

    async fn login_with_google(&self, _id_token: &str) -> AppResult<TokenResponse> {
        Err(AppError::Transport("connection refused".to_owned()))
    }

    async fn current_user(&self) -> AppResult<User> {
        Ok(admin())
    }

    async fn register(&self, input: &CreateUserInput) -> AppResult<User> {
        self.registrations.lock().await.push(input.clone());
        Ok(User {
            id: 2,
            email: input.email.clone(),
            name: input.name.clone(),
            role: Some("USER".to_owned()),
            is_active: true,
            created_at: None,
        })
    }
}

#[derive(Default)]
struct FakeTokenStore {
    token: Mutex<Option<String>>,
    clears: Mutex<usize>,
}

impl FakeTokenStore {
    fn holding(token: String) -> Self {
        Self {
            token: Mutex::new(Some(token)),
            clears: Mutex::new(0),
        }
    }
}

#[async_trait]
impl TokenStore for FakeTokenStore {
    async fn load(&self) -> AppResult<Option<String>> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &str) -> AppResult<()> {
        *self.token.lock().await = Some(token.to_owned());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.clears.lock().await += 1;
        *self.token.lock().await = None;
        Ok(())
    }
}

fn service(
    auth: Arc<FakeAuthGateway>,
    tokens: Arc<FakeTokenStore>,
) -> (SessionService, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (SessionService::new(auth, tokens, notifier.clone()), notifier)
}

#[tokio::test]
async fn login_stores_token_and_returns_user() {
    let auth = Arc::new(FakeAuthGateway::default());
    let tokens = Arc::new(FakeTokenStore::default());
    let (service, notifier) = service(auth.clone(), tokens.clone());

    let user = service.login(" admin@autonomo.app ", "segredo").await;

    assert_eq!(user, Some(admin()));
    assert_eq!(
        tokens.token.lock().await.as_deref(),
        Some("issued-token")
    );
    assert_eq!(
        *auth.logins.lock().await,
        vec![("admin@autonomo.app".to_owned(), "segredo".to_owned())]
    );
    assert_eq!(
        notifier.toasts(),
        vec![Toast::Success("Login realizado com sucesso".to_owned())]
    );
}

#[tokio::test]
async fn rejected_login_surfaces_detail_and_stores_nothing() {
    let auth = Arc::new(FakeAuthGateway {
        reject_login: true,
        ..FakeAuthGateway::default()
    });
    let tokens = Arc::new(FakeTokenStore::default());
    let (service, notifier) = service(auth, tokens.clone());

    assert_eq!(service.login("admin@autonomo.app", "errada").await, None);
    assert_eq!(*tokens.token.lock().await, None);
    assert_eq!(notifier.errors(), vec!["Email ou senha incorretos"]);
}

#[tokio::test]
async fn blank_credentials_never_reach_the_backend() {
    let auth = Arc::new(FakeAuthGateway::default());
    let tokens = Arc::new(FakeTokenStore::default());
    let (service, notifier) = service(auth.clone(), tokens);

    assert_eq!(service.login("   ", "segredo").await, None);
    assert!(auth.logins.lock().await.is_empty());
    assert_eq!(notifier.errors().len(), 1);
}

#[tokio::test]
async fn google_transport_failure_uses_fallback() {
    let auth = Arc::new(FakeAuthGateway::default());
    let tokens = Arc::new(FakeTokenStore::default());
    let (service, notifier) = service(auth, tokens);

    assert_eq!(service.login_with_google("google-id-token").await, None);
    assert_eq!(notifier.errors(), vec!["Erro ao fazer login com Google"]);
}

#[tokio::test]
async fn register_validates_before_sending() {
    let auth = Arc::new(FakeAuthGateway::default());
    let tokens = Arc::new(FakeTokenStore::default());
    let (service, notifier) = service(auth.clone(), tokens.clone());

    let rejected = service
        .register(CreateUserInput {
            email: "novo@autonomo.app".to_owned(),
            name: "Novo".to_owned(),
            password: "curta".to_owned(),
        })
        .await;
    assert_eq!(rejected, None);
    assert!(auth.registrations.lock().await.is_empty());
    assert_eq!(
        notifier.errors(),
        vec!["password must be at least 8 characters"]
    );

    let created = service
        .register(CreateUserInput {
            email: "Novo@Autonomo.app".to_owned(),
            name: "Novo".to_owned(),
            password: "senha-segura".to_owned(),
        })
        .await;
    assert_eq!(
        created.map(|user| user.email),
        Some("novo@autonomo.app".to_owned())
    );
    assert_eq!(*tokens.token.lock().await, None);
}

#[tokio::test]
async fn valid_token_is_authenticated_and_kept() {
    let token = token_expiring_in(Duration::hours(1));
    let tokens = Arc::new(FakeTokenStore::holding(token.clone()));
    let (service, _notifier) = service(Arc::new(FakeAuthGateway::default()), tokens.clone());

    assert!(service.is_authenticated(Utc::now()).await);
    assert_eq!(tokens.token.lock().await.as_deref(), Some(token.as_str()));
    assert_eq!(*tokens.clears.lock().await, 0);
}

#[tokio::test]
async fn expired_token_is_removed() {
    let tokens = Arc::new(FakeTokenStore::holding(token_expiring_in(
        -Duration::minutes(1),
    )));
    let (service, _notifier) = service(Arc::new(FakeAuthGateway::default()), tokens.clone());

    assert!(!service.is_authenticated(Utc::now()).await);
    assert_eq!(*tokens.token.lock().await, None);
}

#[tokio::test]
async fn malformed_token_is_removed() {
    let tokens = Arc::new(FakeTokenStore::holding("not-a-jwt".to_owned()));
    let (service, _notifier) = service(Arc::new(FakeAuthGateway::default()), tokens.clone());

    assert!(!service.is_authenticated(Utc::now()).await);
    assert_eq!(*tokens.token.lock().await, None);
    assert_eq!(*tokens.clears.lock().await, 1);
}

#[tokio::test]
async fn missing_token_is_not_authenticated() {
    let tokens = Arc::new(FakeTokenStore::default());
    let (service, _notifier) = service(Arc::new(FakeAuthGateway::default()), tokens.clone());

    assert!(!service.is_authenticated(Utc::now()).await);
    assert_eq!(*tokens.clears.lock().await, 0);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let tokens = Arc::new(FakeTokenStore::holding("issued-token".to_owned()));
    let (service, notifier) = service(Arc::new(FakeAuthGateway::default()), tokens.clone());

    service.logout().await;
    service.logout().await;

    assert_eq!(*tokens.token.lock().await, None);
    assert_eq!(notifier.errors(), Vec::<String>::new());
    assert_eq!(notifier.toasts().len(), 2);
}
