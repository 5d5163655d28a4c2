use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::{encode_query, push_defined};

/// Default page size requested when no explicit limit is given.
pub const DEFAULT_AUDIT_LOG_LIMIT: u32 = 100;

/// Default window, in days, for audit statistics.
pub const DEFAULT_STATS_DAYS: u32 = 30;

/// Audit log entry as returned by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Server-assigned identifier.
    pub id: i64,
    /// Action code such as `CREATE_USER`.
    pub action: String,
    /// Resource type code such as `SYSTEM_CONFIG`.
    pub resource_type: String,
    /// Identifier of the affected resource, when one exists.
    #[serde(default)]
    pub resource_id: Option<String>,
    /// Email of the acting user.
    pub performed_by: String,
    /// Human readable description.
    pub description: String,
    /// Structured detail payload.
    #[serde(default)]
    pub details: Option<Value>,
    /// Client IP address recorded by the backend.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Client user agent recorded by the backend.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Event timestamp as sent by the backend (ISO 8601).
    pub timestamp: String,
}

/// Query parameters for audit log listing.
///
/// Every field is optional; absent fields are omitted from the query string
/// while zero and empty values are sent as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogFilter {
    /// Rows skipped for offset pagination.
    pub skip: Option<u32>,
    /// Maximum rows returned.
    pub limit: Option<u32>,
    /// Action code filter.
    pub action: Option<String>,
    /// Resource type filter.
    pub resource_type: Option<String>,
    /// Actor email filter.
    pub performed_by: Option<String>,
    /// Inclusive lower bound (ISO date or datetime).
    pub start_date: Option<String>,
    /// Inclusive upper bound (ISO date or datetime).
    pub end_date: Option<String>,
}

impl Default for AuditLogFilter {
    fn default() -> Self {
        Self {
            skip: Some(0),
            limit: Some(DEFAULT_AUDIT_LOG_LIMIT),
            action: None,
            resource_type: None,
            performed_by: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl AuditLogFilter {
    /// Returns the defined parameters in wire order:
    /// `skip, limit, action, resource_type, performed_by, start_date, end_date`.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_defined(&mut pairs, "skip", self.skip.map(|value| value.to_string()));
        push_defined(&mut pairs, "limit", self.limit.map(|value| value.to_string()));
        push_defined(&mut pairs, "action", self.action.clone());
        push_defined(&mut pairs, "resource_type", self.resource_type.clone());
        push_defined(&mut pairs, "performed_by", self.performed_by.clone());
        push_defined(&mut pairs, "start_date", self.start_date.clone());
        push_defined(&mut pairs, "end_date", self.end_date.clone());
        pairs
    }

    /// Returns the URL-encoded query string without the leading `?`.
    #[must_use]
    pub fn query_string(&self) -> String {
        encode_query(&self.query_pairs())
    }
}

/// Ranked action counter inside [`AuditLogStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCount {
    /// Action code.
    pub action: String,
    /// Occurrences in the window.
    pub count: u64,
}

/// Ranked user counter inside [`AuditLogStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCount {
    /// Actor email.
    #[serde(alias = "performed_by")]
    pub user: String,
    /// Occurrences in the window.
    pub count: u64,
}

/// Aggregated audit statistics computed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditLogStats {
    /// Total entries in the window.
    #[serde(default)]
    pub total_logs: u64,
    /// Distinct actors in the window.
    #[serde(default)]
    pub unique_users: u64,
    /// Entries recorded today.
    #[serde(default)]
    pub logs_today: u64,
    /// Entries recorded during the current week.
    #[serde(default)]
    pub logs_this_week: u64,
    /// Most frequent actions, highest first.
    #[serde(default)]
    pub top_actions: Vec<ActionCount>,
    /// Most active users, highest first.
    #[serde(default)]
    pub top_users: Vec<UserCount>,
}

impl AuditLogStats {
    /// Returns `count` as a percentage of `total_logs`; zero when there are no logs.
    #[must_use]
    pub fn share_percent(&self, count: u64) -> f64 {
        if self.total_logs == 0 {
            return 0.0;
        }

        count as f64 / self.total_logs as f64 * 100.0
    }

    /// Formats the share of `count` as `(36.0%)`.
    #[must_use]
    pub fn format_share(&self, count: u64) -> String {
        format!("({:.1}%)", self.share_percent(count))
    }
}

/// Response of the retention cleanup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditCleanupResult {
    /// Backend confirmation message.
    pub message: String,
    /// Number of removed entries.
    pub deleted_count: u64,
    /// Entries older than this instant were removed.
    pub cutoff_date: String,
}
