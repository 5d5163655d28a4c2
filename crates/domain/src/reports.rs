//! Administrative report payloads.
//!
//! All aggregates are computed by the backend; the client only displays them,
//! so every field tolerates omission.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default reporting window in days.
pub const DEFAULT_REPORT_DAYS: u32 = 30;

/// User population statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStatistics {
    /// All registered users.
    pub total_users: u64,
    /// Users flagged active.
    pub active_users: u64,
    /// Users flagged inactive.
    pub inactive_users: u64,
    /// Users created inside the window.
    pub new_users_period: u64,
    /// Users per role label.
    pub users_by_role: BTreeMap<String, u64>,
    /// Window length in days.
    pub period_days: u32,
}

/// Application usage statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemUsageStatistics {
    /// All recorded transactions.
    pub total_transactions: u64,
    /// Transactions inside the window.
    pub transactions_period: u64,
    /// Categories defined across users.
    pub total_categories: u64,
    /// Logins inside the window.
    pub logins_period: u64,
    /// Average transactions per active user.
    pub average_transactions_per_user: f64,
    /// Window length in days.
    pub period_days: u32,
}

/// Total amount grouped by category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTotal {
    /// Category name.
    pub category: String,
    /// Summed amount.
    pub total: f64,
    /// Transactions in the category.
    pub transaction_count: u64,
}

/// Platform-wide financial overview.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialOverview {
    /// Sum of income transactions.
    pub total_income: f64,
    /// Sum of expense transactions.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub net_balance: f64,
    /// Transactions inside the window.
    pub transaction_count: u64,
    /// Largest categories by amount.
    pub top_categories: Vec<CategoryTotal>,
    /// Window length in days.
    pub period_days: u32,
}

/// Backend health snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemHealthMetrics {
    /// Overall status label (`healthy`, `degraded`, ...).
    pub status: String,
    /// Whether the database answered.
    pub database_connected: bool,
    /// Rows across monitored tables.
    pub total_records: u64,
    /// Failed requests ratio over the last day.
    pub error_rate: f64,
    /// Mean response time in milliseconds.
    pub average_response_time_ms: f64,
    /// Instant the snapshot was taken.
    pub checked_at: String,
}

/// Active users on one day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyActivity {
    /// ISO date.
    pub date: String,
    /// Distinct active users.
    pub active_users: u64,
}

/// Activity of one user inside the window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserActivity {
    /// User email.
    pub user: String,
    /// Recorded actions.
    pub actions: u64,
}

/// User engagement over a window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEngagementReport {
    /// Daily active user series.
    pub daily_active_users: Vec<DailyActivity>,
    /// Most active users, highest first.
    pub most_active_users: Vec<UserActivity>,
    /// Share of users active in consecutive windows.
    pub retention_rate: f64,
    /// Window length in days.
    pub period_days: u32,
}

/// Aggregate used by the admin landing page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminDashboardData {
    /// User statistics block.
    pub user_statistics: UserStatistics,
    /// Usage statistics block.
    pub usage_statistics: SystemUsageStatistics,
    /// Financial block.
    pub financial_overview: FinancialOverview,
    /// Health block.
    pub health_metrics: SystemHealthMetrics,
    /// Instant the dashboard was generated.
    pub generated_at: String,
}
