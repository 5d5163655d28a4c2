//! Domain entities and pure display rules of the Autonomo admin console.

#![forbid(unsafe_code)]

mod audit;
mod config;
mod csv_export;
mod labels;
mod query;
mod reports;
mod token;
mod user;

pub use audit::{
    ActionCount, AuditCleanupResult, AuditLogEntry, AuditLogFilter, AuditLogStats,
    DEFAULT_AUDIT_LOG_LIMIT, DEFAULT_STATS_DAYS, UserCount,
};
pub use config::{
    ConfigBatchUpdate, ConfigEditor, ConfigFieldType, ConfigHistoryItem, ConfigHistoryQuery,
    ConfigListQuery, ConfigUpdate, ConfigValue, DraftState, SystemConfigMap, config_category,
    field_type_for,
};
pub use csv_export::{AUDIT_CSV_HEADER, CsvExport, EMPTY_EXPORT_MESSAGE, audit_logs_csv};
pub use labels::{action_badge_color, format_action, format_date, format_resource_type};
pub use query::encode_query;
pub use reports::{
    AdminDashboardData, CategoryTotal, DEFAULT_REPORT_DAYS, DailyActivity, FinancialOverview,
    SystemHealthMetrics, SystemUsageStatistics, UserActivity, UserEngagementReport,
    UserStatistics,
};
pub use token::{TokenStatus, inspect_token};
pub use user::{
    AdminUserFilter, CreateUserInput, EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
    TokenResponse, User, UserStatusUpdate,
};
