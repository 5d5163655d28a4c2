use async_trait::async_trait;
use autonomo_application::SystemReportsGateway;
use autonomo_core::AppResult;
use autonomo_domain::{
    AdminDashboardData, FinancialOverview, SystemHealthMetrics, SystemUsageStatistics,
    UserEngagementReport, UserStatistics,
};

use crate::api_client::ApiClient;

const RESOURCE: &str = "system-reports";

/// REST implementation of the administrative reports resource.
#[derive(Clone)]
pub struct HttpSystemReportsGateway {
    client: ApiClient,
}

impl HttpSystemReportsGateway {
    /// Creates a new reports gateway.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn window(days: u32) -> [(&'static str, String); 1] {
    [("days", days.to_string())]
}

#[async_trait]
impl SystemReportsGateway for HttpSystemReportsGateway {
    async fn user_statistics(&self, days: u32) -> AppResult<UserStatistics> {
        self.client.get(&[RESOURCE, "users"], &window(days)).await
    }

    async fn usage_statistics(&self, days: u32) -> AppResult<SystemUsageStatistics> {
        self.client.get(&[RESOURCE, "usage"], &window(days)).await
    }

    async fn financial_overview(&self, days: u32) -> AppResult<FinancialOverview> {
        self.client
            .get(&[RESOURCE, "financial"], &window(days))
            .await
    }

    async fn engagement(&self, days: u32) -> AppResult<UserEngagementReport> {
        self.client
            .get(&[RESOURCE, "engagement"], &window(days))
            .await
    }

    async fn health(&self) -> AppResult<SystemHealthMetrics> {
        self.client.get(&[RESOURCE, "health"], &[]).await
    }

    async fn dashboard(&self) -> AppResult<AdminDashboardData> {
        self.client.get(&[RESOURCE, "dashboard"], &[]).await
    }
}
