use async_trait::async_trait;
use autonomo_core::AppResult;
use autonomo_domain::{AuditCleanupResult, AuditLogEntry, AuditLogFilter, AuditLogStats};

/// Port for the audit log REST resource.
#[async_trait]
pub trait AuditLogGateway: Send + Sync {
    /// Lists entries matching the filter.
    async fn list_logs(&self, filter: &AuditLogFilter) -> AppResult<Vec<AuditLogEntry>>;

    /// Lists distinct action codes known to the backend.
    async fn list_actions(&self) -> AppResult<Vec<String>>;

    /// Lists distinct resource type codes known to the backend.
    async fn list_resource_types(&self) -> AppResult<Vec<String>>;

    /// Returns aggregated statistics over the last `days`.
    async fn stats(&self, days: u32) -> AppResult<AuditLogStats>;

    /// Deletes entries older than `days_to_keep` days.
    async fn cleanup(&self, days_to_keep: u32) -> AppResult<AuditCleanupResult>;
}
