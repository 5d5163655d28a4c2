use std::sync::Arc;

use autonomo_domain::{AdminUserFilter, User};
use tracing::info;

use crate::feedback::settle;
use crate::ports::{AdminUserGateway, Notifier};

const LIST_USERS_FALLBACK: &str = "Erro ao carregar usuários";
const GET_USER_FALLBACK: &str = "Erro ao carregar usuário";
const UPDATE_STATUS_FALLBACK: &str = "Erro ao atualizar status do usuário";

/// Account administration actions for master operators.
#[derive(Clone)]
pub struct AdminUserService {
    gateway: Arc<dyn AdminUserGateway>,
    notifier: Arc<dyn Notifier>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    #[must_use]
    pub fn new(gateway: Arc<dyn AdminUserGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self { gateway, notifier }
    }

    /// Lists accounts matching `filter`.
    pub async fn list_users(&self, filter: &AdminUserFilter) -> Option<Vec<User>> {
        let result = self.gateway.list_users(filter).await;
        settle(
            self.notifier.as_ref(),
            "admin_users.list",
            result,
            LIST_USERS_FALLBACK,
        )
    }

    /// Returns one account.
    pub async fn get_user(&self, user_id: i64) -> Option<User> {
        let result = self.gateway.get_user(user_id).await;
        settle(
            self.notifier.as_ref(),
            "admin_users.get",
            result,
            GET_USER_FALLBACK,
        )
    }

    /// Activates or deactivates one account and returns the updated profile.
    pub async fn set_user_active(&self, user_id: i64, is_active: bool) -> Option<User> {
        let result = self.gateway.set_user_active(user_id, is_active).await;
        let user = settle(
            self.notifier.as_ref(),
            "admin_users.set_active",
            result,
            UPDATE_STATUS_FALLBACK,
        )?;

        info!(user_id, is_active, "user status updated");
        self.notifier.success(if is_active {
            "Usuário ativado com sucesso"
        } else {
            "Usuário desativado com sucesso"
        });
        Some(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use autonomo_core::{AppError, AppResult};
    use autonomo_domain::{AdminUserFilter, User};
    use tokio::sync::Mutex;

    use crate::ports::AdminUserGateway;
    use crate::test_support::{RecordingNotifier, Toast};

    use super::AdminUserService;

    fn user(id: i64, is_active: bool) -> User {
        User {
            id,
            email: format!("user{id}@autonomo.app"),
            name: format!("User {id}"),
            role: Some("USER".to_owned()),
            is_active,
            created_at: None,
        }
    }

    #[derive(Default)]
    struct FakeAdminUserGateway {
        filters: Mutex<Vec<AdminUserFilter>>,
    }

    #[async_trait]
    impl AdminUserGateway for FakeAdminUserGateway {
        async fn list_users(&self, filter: &AdminUserFilter) -> AppResult<Vec<User>> {
            self.filters.lock().await.push(filter.clone());
            Ok(vec![user(1, true), user(2, false)])
        }

        async fn get_user(&self, user_id: i64) -> AppResult<User> {
            if user_id == 1 {
                return Ok(user(1, true));
            }
            Err(AppError::Api {
                status: 404,
                detail: Some("Usuário não encontrado".to_owned()),
            })
        }

        async fn set_user_active(&self, user_id: i64, is_active: bool) -> AppResult<User> {
            if user_id == 1 {
                return Err(AppError::Api {
                    status: 403,
                    detail: None,
                });
            }
            Ok(user(user_id, is_active))
        }
    }

    fn service() -> (AdminUserService, Arc<FakeAdminUserGateway>, Arc<RecordingNotifier>) {
        let gateway = Arc::new(FakeAdminUserGateway::default());
        let notifier = Arc::new(RecordingNotifier::default());
        (
            AdminUserService::new(gateway.clone(), notifier.clone()),
            gateway,
            notifier,
        )
    }

    #[tokio::test]
    async fn list_forwards_filter() {
        let (service, gateway, notifier) = service();
        let filter = AdminUserFilter {
            search: Some("ana".to_owned()),
            ..AdminUserFilter::default()
        };

        let users = service.list_users(&filter).await;

        assert_eq!(users.map(|users| users.len()), Some(2));
        assert_eq!(*gateway.filters.lock().await, vec![filter]);
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn missing_user_reports_server_detail() {
        let (service, _gateway, notifier) = service();

        assert_eq!(service.get_user(99).await, None);
        assert_eq!(notifier.errors(), vec!["Usuário não encontrado"]);
    }

    #[tokio::test]
    async fn status_change_toasts_outcome() {
        let (service, _gateway, notifier) = service();

        let deactivated = service.set_user_active(2, false).await;
        assert_eq!(deactivated.map(|user| user.is_active), Some(false));

        assert_eq!(service.set_user_active(1, false).await, None);
        assert_eq!(
            notifier.toasts(),
            vec![
                Toast::Success("Usuário desativado com sucesso".to_owned()),
                Toast::Error("Erro ao atualizar status do usuário".to_owned()),
            ]
        );
    }
}
