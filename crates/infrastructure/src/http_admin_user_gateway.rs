use async_trait::async_trait;
use autonomo_application::AdminUserGateway;
use autonomo_core::AppResult;
use autonomo_domain::{AdminUserFilter, User, UserStatusUpdate};

use crate::api_client::ApiClient;

/// REST implementation of the admin user management resource.
#[derive(Clone)]
pub struct HttpAdminUserGateway {
    client: ApiClient,
}

impl HttpAdminUserGateway {
    /// Creates a new admin user gateway.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdminUserGateway for HttpAdminUserGateway {
    async fn list_users(&self, filter: &AdminUserFilter) -> AppResult<Vec<User>> {
        self.client
            .get(&["admin", "users", ""], &filter.query_pairs())
            .await
    }

    async fn get_user(&self, user_id: i64) -> AppResult<User> {
        let user_id = user_id.to_string();
        self.client
            .get(&["admin", "users", user_id.as_str()], &[])
            .await
    }

    async fn set_user_active(&self, user_id: i64, is_active: bool) -> AppResult<User> {
        let user_id = user_id.to_string();
        self.client
            .patch_json(
                &["admin", "users", user_id.as_str(), "status"],
                &UserStatusUpdate { is_active },
            )
            .await
    }
}
