//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod api_client;
mod file_token_store;
mod http_admin_user_gateway;
mod http_audit_log_gateway;
mod http_auth_gateway;
mod http_system_config_gateway;
mod http_system_reports_gateway;
mod in_memory_token_store;
mod tracing_notifier;

#[cfg(test)]
mod stub_backend;

pub use api_client::{ApiClient, ApiEnvelope};
pub use file_token_store::FileTokenStore;
pub use http_admin_user_gateway::HttpAdminUserGateway;
pub use http_audit_log_gateway::HttpAuditLogGateway;
pub use http_auth_gateway::HttpAuthGateway;
pub use http_system_config_gateway::HttpSystemConfigGateway;
pub use http_system_reports_gateway::HttpSystemReportsGateway;
pub use in_memory_token_store::InMemoryTokenStore;
pub use tracing_notifier::TracingNotifier;
