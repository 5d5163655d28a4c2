mod admin_users;
mod audit_logs;
mod auth;
mod notifier;
mod system_config;
mod system_reports;
mod token_store;

pub use admin_users::AdminUserGateway;
pub use audit_logs::AuditLogGateway;
pub use auth::AuthGateway;
pub use notifier::Notifier;
pub use system_config::SystemConfigGateway;
pub use system_reports::SystemReportsGateway;
pub use token_store::TokenStore;
