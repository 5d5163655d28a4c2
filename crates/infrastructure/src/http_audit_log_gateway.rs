use async_trait::async_trait;
use autonomo_application::AuditLogGateway;
use autonomo_core::AppResult;
use autonomo_domain::{AuditCleanupResult, AuditLogEntry, AuditLogFilter, AuditLogStats};

use crate::api_client::ApiClient;

/// REST implementation of the audit log resource.
#[derive(Clone)]
pub struct HttpAuditLogGateway {
    client: ApiClient,
}

impl HttpAuditLogGateway {
    /// Creates a new audit log gateway.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuditLogGateway for HttpAuditLogGateway {
    async fn list_logs(&self, filter: &AuditLogFilter) -> AppResult<Vec<AuditLogEntry>> {
        self.client
            .get(&["audit-logs", ""], &filter.query_pairs())
            .await
    }

    async fn list_actions(&self) -> AppResult<Vec<String>> {
        self.client.get(&["audit-logs", "actions"], &[]).await
    }

    async fn list_resource_types(&self) -> AppResult<Vec<String>> {
        self.client.get(&["audit-logs", "resource-types"], &[]).await
    }

    async fn stats(&self, days: u32) -> AppResult<AuditLogStats> {
        self.client
            .get(&["audit-logs", "stats"], &[("days", days.to_string())])
            .await
    }

    async fn cleanup(&self, days_to_keep: u32) -> AppResult<AuditCleanupResult> {
        self.client
            .delete(
                &["audit-logs", "cleanup"],
                &[("days_to_keep", days_to_keep.to_string())],
            )
            .await
    }
}
