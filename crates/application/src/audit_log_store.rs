use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use autonomo_domain::{
    AuditLogEntry, AuditLogFilter, AuditLogStats, CsvExport, DEFAULT_STATS_DAYS, audit_logs_csv,
};
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::feedback::{report_failure, settle};
use crate::ports::{AuditLogGateway, Notifier};
use crate::request_sequence::RequestSequence;

const LOAD_LOGS_FALLBACK: &str = "Erro ao carregar logs de auditoria";
const LOAD_STATS_FALLBACK: &str = "Erro ao carregar estatísticas de auditoria";
const CLEANUP_FALLBACK: &str = "Erro ao limpar logs de auditoria";

/// Observable state of the audit log screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogState {
    /// Entries of the last applied listing.
    pub logs: Vec<AuditLogEntry>,
    /// Number of entries in `logs`.
    pub total_logs: usize,
    /// Statistics of the last applied stats request.
    pub stats: Option<AuditLogStats>,
    /// Filter options for the action selector.
    pub actions: Vec<String>,
    /// Filter options for the resource type selector.
    pub resource_types: Vec<String>,
    /// Filter used by the last listing request.
    pub filter: AuditLogFilter,
    /// A listing request is in flight.
    pub loading: bool,
    /// A stats request is in flight.
    pub stats_loading: bool,
    /// A cleanup request is in flight.
    pub updating: bool,
    /// Message of the last failure not yet dismissed.
    pub error: Option<String>,
}

impl Default for AuditLogState {
    fn default() -> Self {
        Self {
            logs: Vec::new(),
            total_logs: 0,
            stats: None,
            actions: Vec::new(),
            resource_types: Vec::new(),
            filter: AuditLogFilter::default(),
            loading: false,
            stats_loading: false,
            updating: false,
            error: None,
        }
    }
}

struct AuditLogStoreInner {
    gateway: Arc<dyn AuditLogGateway>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<AuditLogState>,
    logs_sequence: RequestSequence,
    stats_sequence: RequestSequence,
    mounted: AtomicBool,
}

/// Audit log screen state plus the actions that drive it.
///
/// Actions never fail: failures end up in `error` and in the notifier.
#[derive(Clone)]
pub struct AuditLogStore {
    inner: Arc<AuditLogStoreInner>,
}

impl AuditLogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuditLogGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(AuditLogStoreInner {
                gateway,
                notifier,
                state: RwLock::new(AuditLogState::default()),
                logs_sequence: RequestSequence::new(),
                stats_sequence: RequestSequence::new(),
                mounted: AtomicBool::new(false),
            }),
        }
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> AuditLogState {
        self.inner.state.read().await.clone()
    }

    /// Runs the initial listing and filter-option fetch. Later calls are no-ops.
    pub async fn mount(&self) {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return;
        }

        tokio::join!(self.load_logs(None), self.refresh_filters());
    }

    /// Loads entries with `filter`, or with the last used filter when `None`.
    pub async fn load_logs(&self, filter: Option<AuditLogFilter>) {
        let ticket = self.inner.logs_sequence.issue();
        let filter = {
            let mut state = self.inner.state.write().await;
            if let Some(filter) = filter {
                state.filter = filter;
            }
            state.loading = true;
            state.error = None;
            state.filter.clone()
        };

        let result = self.inner.gateway.list_logs(&filter).await;

        let mut state = self.inner.state.write().await;
        if !self.inner.logs_sequence.try_apply(ticket) {
            debug!(?ticket, "discarding stale audit log listing");
            return;
        }
        let latest = self.inner.logs_sequence.is_latest(ticket);
        state.loading = !latest;

        match result {
            Ok(logs) => {
                state.total_logs = logs.len();
                state.logs = logs;
            }
            Err(failure) if !latest => {
                debug!(
                    ?ticket,
                    error = %failure,
                    "ignoring failure of superseded audit log listing"
                );
            }
            Err(failure) => {
                let message = report_failure(
                    self.inner.notifier.as_ref(),
                    "audit_logs.load",
                    &failure,
                    LOAD_LOGS_FALLBACK,
                );
                state.error = Some(message);
            }
        }
    }

    /// Replaces the filter, restarting from the first page, and reloads.
    pub async fn apply_filter(&self, filter: AuditLogFilter) {
        let filter = AuditLogFilter {
            skip: Some(0),
            ..filter
        };
        self.load_logs(Some(filter)).await;
    }

    /// Loads statistics for the last `days` (30 when `None`).
    pub async fn load_stats(&self, days: Option<u32>) {
        let days = days.unwrap_or(DEFAULT_STATS_DAYS);
        let ticket = self.inner.stats_sequence.issue();
        {
            let mut state = self.inner.state.write().await;
            state.stats_loading = true;
            state.error = None;
        }

        let result = self.inner.gateway.stats(days).await;

        let mut state = self.inner.state.write().await;
        if !self.inner.stats_sequence.try_apply(ticket) {
            debug!(?ticket, "discarding stale audit stats");
            return;
        }
        let latest = self.inner.stats_sequence.is_latest(ticket);
        state.stats_loading = !latest;

        match result {
            Ok(stats) => state.stats = Some(stats),
            Err(failure) if !latest => {
                debug!(?ticket, error = %failure, "ignoring failure of superseded audit stats");
            }
            Err(failure) => {
                let message = report_failure(
                    self.inner.notifier.as_ref(),
                    "audit_logs.stats",
                    &failure,
                    LOAD_STATS_FALLBACK,
                );
                state.error = Some(message);
            }
        }
    }

    /// Refreshes the action and resource type options.
    ///
    /// Failures are only logged; the previous options stay in place.
    pub async fn refresh_filters(&self) {
        let (actions, resource_types) = tokio::join!(
            self.inner.gateway.list_actions(),
            self.inner.gateway.list_resource_types()
        );

        match (actions, resource_types) {
            (Ok(actions), Ok(resource_types)) => {
                let mut state = self.inner.state.write().await;
                state.actions = actions;
                state.resource_types = resource_types;
            }
            (Err(error), _) | (_, Err(error)) => {
                warn!(error = %error, "failed to refresh audit log filter options");
            }
        }
    }

    /// Deletes entries older than `days_to_keep` and reloads list and stats.
    ///
    /// Returns whether the cleanup succeeded.
    pub async fn cleanup_logs(&self, days_to_keep: u32) -> bool {
        self.inner.state.write().await.updating = true;

        let succeeded = match self.inner.gateway.cleanup(days_to_keep).await {
            Ok(cleanup) => {
                info!(
                    deleted_count = cleanup.deleted_count,
                    cutoff_date = %cleanup.cutoff_date,
                    "audit logs cleaned up"
                );
                self.inner.notifier.success(
                    format!("{} logs removidos com sucesso", cleanup.deleted_count).as_str(),
                );
                tokio::join!(self.load_logs(None), self.load_stats(None));
                true
            }
            Err(failure) => {
                let message = report_failure(
                    self.inner.notifier.as_ref(),
                    "audit_logs.cleanup",
                    &failure,
                    CLEANUP_FALLBACK,
                );
                self.inner.state.write().await.error = Some(message);
                false
            }
        };

        self.inner.state.write().await.updating = false;
        succeeded
    }

    /// Renders the loaded entries as CSV.
    ///
    /// Returns `None` and raises an error toast when nothing is loaded.
    pub async fn export_csv(&self, exported_on: NaiveDate) -> Option<CsvExport> {
        let logs = self.inner.state.read().await.logs.clone();
        let export = settle(
            self.inner.notifier.as_ref(),
            "audit_logs.export",
            audit_logs_csv(&logs, exported_on),
            LOAD_LOGS_FALLBACK,
        )?;

        info!(
            filename = %export.filename,
            rows = export.row_count,
            "audit logs exported"
        );
        self.inner.notifier.success("Logs exportados com sucesso");
        Some(export)
    }

    /// Dismisses the current error without touching any other field.
    pub async fn clear_error(&self) {
        self.inner.state.write().await.error = None;
    }
}
