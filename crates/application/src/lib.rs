//! Application stores, services and ports of the Autonomo admin console.

#![forbid(unsafe_code)]

mod admin_user_service;
mod audit_log_store;
mod feedback;
mod ports;
mod request_sequence;
mod session_service;
mod system_config_store;
mod system_reports_store;

#[cfg(test)]
mod test_support;

pub use admin_user_service::AdminUserService;
pub use audit_log_store::{AuditLogState, AuditLogStore};
pub use ports::{
    AdminUserGateway, AuditLogGateway, AuthGateway, Notifier, SystemConfigGateway,
    SystemReportsGateway, TokenStore,
};
pub use request_sequence::{RequestSequence, RequestTicket};
pub use session_service::SessionService;
pub use system_config_store::{ConfigDraft, SystemConfigState, SystemConfigStore};
pub use system_reports_store::{SystemReportsState, SystemReportsStore};
