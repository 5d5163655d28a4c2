use async_trait::async_trait;
use autonomo_core::AppResult;
use autonomo_domain::{
    AdminDashboardData, FinancialOverview, SystemHealthMetrics, SystemUsageStatistics,
    UserEngagementReport, UserStatistics,
};

/// Port for the administrative reports REST resource.
#[async_trait]
pub trait SystemReportsGateway: Send + Sync {
    /// User population over the last `days`.
    async fn user_statistics(&self, days: u32) -> AppResult<UserStatistics>;

    /// Usage over the last `days`.
    async fn usage_statistics(&self, days: u32) -> AppResult<SystemUsageStatistics>;

    /// Financial totals over the last `days`.
    async fn financial_overview(&self, days: u32) -> AppResult<FinancialOverview>;

    /// Engagement over the last `days`.
    async fn engagement(&self, days: u32) -> AppResult<UserEngagementReport>;

    /// Current backend health.
    async fn health(&self) -> AppResult<SystemHealthMetrics>;

    /// Landing page aggregate.
    async fn dashboard(&self) -> AppResult<AdminDashboardData>;
}
