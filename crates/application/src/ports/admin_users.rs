use async_trait::async_trait;
use autonomo_core::AppResult;
use autonomo_domain::{AdminUserFilter, User};

/// Port for the admin user management REST resource.
#[async_trait]
pub trait AdminUserGateway: Send + Sync {
    /// Lists accounts matching the filter.
    async fn list_users(&self, filter: &AdminUserFilter) -> AppResult<Vec<User>>;

    /// Returns one account.
    async fn get_user(&self, user_id: i64) -> AppResult<User>;

    /// Activates or deactivates one account.
    async fn set_user_active(&self, user_id: i64, is_active: bool) -> AppResult<User>;
}
