use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use autonomo_core::AppResult;
use autonomo_domain::{
    AdminDashboardData, DEFAULT_REPORT_DAYS, FinancialOverview, SystemHealthMetrics,
    SystemUsageStatistics, UserEngagementReport, UserStatistics,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::feedback::report_failure;
use crate::ports::{Notifier, SystemReportsGateway};
use crate::request_sequence::RequestSequence;

const DASHBOARD_FALLBACK: &str = "Erro ao carregar dashboard";
const USER_STATISTICS_FALLBACK: &str = "Erro ao carregar estatísticas de usuários";
const USAGE_STATISTICS_FALLBACK: &str = "Erro ao carregar estatísticas de uso";
const FINANCIAL_FALLBACK: &str = "Erro ao carregar visão financeira";
const ENGAGEMENT_FALLBACK: &str = "Erro ao carregar relatório de engajamento";
const HEALTH_FALLBACK: &str = "Erro ao carregar métricas de saúde do sistema";

/// Observable state of the reports screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemReportsState {
    /// Landing page aggregate.
    pub dashboard: Option<AdminDashboardData>,
    /// User population panel.
    pub user_statistics: Option<UserStatistics>,
    /// Usage panel.
    pub usage_statistics: Option<SystemUsageStatistics>,
    /// Financial panel.
    pub financial_overview: Option<FinancialOverview>,
    /// Engagement panel.
    pub engagement: Option<UserEngagementReport>,
    /// Health panel.
    pub health: Option<SystemHealthMetrics>,
    /// At least one report other than health is in flight.
    pub loading: bool,
    /// A health request is in flight.
    pub health_loading: bool,
    /// Message of the last failure not yet dismissed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Panel {
    Reports,
    Health,
}

struct SystemReportsStoreInner {
    gateway: Arc<dyn SystemReportsGateway>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SystemReportsState>,
    dashboard_sequence: RequestSequence,
    user_statistics_sequence: RequestSequence,
    usage_statistics_sequence: RequestSequence,
    financial_sequence: RequestSequence,
    engagement_sequence: RequestSequence,
    health_sequence: RequestSequence,
    reports_in_flight: AtomicUsize,
    mounted: AtomicBool,
}

/// Reports screen state plus the actions that drive it.
///
/// The error is cleared once per public action, so a batch keeps the failure
/// of any of its panels. Each panel has its own request sequence: reloading
/// one panel never discards another panel's response.
#[derive(Clone)]
pub struct SystemReportsStore {
    inner: Arc<SystemReportsStoreInner>,
}

impl SystemReportsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(gateway: Arc<dyn SystemReportsGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(SystemReportsStoreInner {
                gateway,
                notifier,
                state: RwLock::new(SystemReportsState::default()),
                dashboard_sequence: RequestSequence::new(),
                user_statistics_sequence: RequestSequence::new(),
                usage_statistics_sequence: RequestSequence::new(),
                financial_sequence: RequestSequence::new(),
                engagement_sequence: RequestSequence::new(),
                health_sequence: RequestSequence::new(),
                reports_in_flight: AtomicUsize::new(0),
                mounted: AtomicBool::new(false),
            }),
        }
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> SystemReportsState {
        self.inner.state.read().await.clone()
    }

    /// Loads the dashboard and the health panel. Later calls are no-ops.
    pub async fn mount(&self) {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return;
        }

        self.reset_error().await;
        tokio::join!(self.fetch_dashboard(), self.fetch_health());
    }

    /// Loads the landing page aggregate.
    pub async fn load_dashboard(&self) {
        self.reset_error().await;
        self.fetch_dashboard().await;
    }

    /// Loads user statistics for the last `days` (30 when `None`).
    pub async fn load_user_statistics(&self, days: Option<u32>) {
        self.reset_error().await;
        self.fetch_user_statistics(days).await;
    }

    /// Loads usage statistics for the last `days` (30 when `None`).
    pub async fn load_usage_statistics(&self, days: Option<u32>) {
        self.reset_error().await;
        self.fetch_usage_statistics(days).await;
    }

    /// Loads the financial overview for the last `days` (30 when `None`).
    pub async fn load_financial_overview(&self, days: Option<u32>) {
        self.reset_error().await;
        self.fetch_financial_overview(days).await;
    }

    /// Loads the engagement report for the last `days` (30 when `None`).
    pub async fn load_engagement(&self, days: Option<u32>) {
        self.reset_error().await;
        self.fetch_engagement(days).await;
    }

    /// Loads the health panel, tracked by `health_loading`.
    pub async fn load_health(&self) {
        self.reset_error().await;
        self.fetch_health().await;
    }

    async fn fetch_dashboard(&self) {
        let gateway = Arc::clone(&self.inner.gateway);
        self.load_panel(
            "system_reports.dashboard",
            &self.inner.dashboard_sequence,
            Panel::Reports,
            async move { gateway.dashboard().await },
            DASHBOARD_FALLBACK,
            |state, dashboard| state.dashboard = Some(dashboard),
        )
        .await;
    }

    async fn fetch_user_statistics(&self, days: Option<u32>) {
        let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let gateway = Arc::clone(&self.inner.gateway);
        self.load_panel(
            "system_reports.users",
            &self.inner.user_statistics_sequence,
            Panel::Reports,
            async move { gateway.user_statistics(days).await },
            USER_STATISTICS_FALLBACK,
            |state, statistics| state.user_statistics = Some(statistics),
        )
        .await;
    }

    async fn fetch_usage_statistics(&self, days: Option<u32>) {
        let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let gateway = Arc::clone(&self.inner.gateway);
        self.load_panel(
            "system_reports.usage",
            &self.inner.usage_statistics_sequence,
            Panel::Reports,
            async move { gateway.usage_statistics(days).await },
            USAGE_STATISTICS_FALLBACK,
            |state, statistics| state.usage_statistics = Some(statistics),
        )
        .await;
    }

    async fn fetch_financial_overview(&self, days: Option<u32>) {
        let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let gateway = Arc::clone(&self.inner.gateway);
        self.load_panel(
            "system_reports.financial",
            &self.inner.financial_sequence,
            Panel::Reports,
            async move { gateway.financial_overview(days).await },
            FINANCIAL_FALLBACK,
            |state, overview| state.financial_overview = Some(overview),
        )
        .await;
    }

    async fn fetch_engagement(&self, days: Option<u32>) {
        let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let gateway = Arc::clone(&self.inner.gateway);
        self.load_panel(
            "system_reports.engagement",
            &self.inner.engagement_sequence,
            Panel::Reports,
            async move { gateway.engagement(days).await },
            ENGAGEMENT_FALLBACK,
            |state, report| state.engagement = Some(report),
        )
        .await;
    }

    async fn fetch_health(&self) {
        let gateway = Arc::clone(&self.inner.gateway);
        self.load_panel(
            "system_reports.health",
            &self.inner.health_sequence,
            Panel::Health,
            async move { gateway.health().await },
            HEALTH_FALLBACK,
            |state, health| state.health = Some(health),
        )
        .await;
    }

    /// Loads every windowed report plus health concurrently.
    pub async fn load_all(&self, days: Option<u32>) {
        self.reset_error().await;
        tokio::join!(
            self.fetch_user_statistics(days),
            self.fetch_usage_statistics(days),
            self.fetch_financial_overview(days),
            self.fetch_engagement(days),
            self.fetch_health()
        );
    }

    async fn reset_error(&self) {
        self.inner.state.write().await.error = None;
    }

    async fn load_panel<T, F>(
        &self,
        operation: &'static str,
        sequence: &RequestSequence,
        panel: Panel,
        request: F,
        fallback: &str,
        apply: impl FnOnce(&mut SystemReportsState, T),
    ) where
        F: Future<Output = AppResult<T>>,
    {
        let ticket = sequence.issue();
        {
            let mut state = self.inner.state.write().await;
            match panel {
                Panel::Reports => {
                    self.inner.reports_in_flight.fetch_add(1, Ordering::SeqCst);
                    state.loading = true;
                }
                Panel::Health => state.health_loading = true,
            }
        }

        let result = request.await;

        let mut state = self.inner.state.write().await;
        if let Panel::Reports = panel {
            let remaining = self
                .inner
                .reports_in_flight
                .fetch_sub(1, Ordering::SeqCst)
                .saturating_sub(1);
            state.loading = remaining > 0;
        }

        if !sequence.try_apply(ticket) {
            debug!(?ticket, operation, "discarding stale report");
            return;
        }
        let latest = sequence.is_latest(ticket);
        if let Panel::Health = panel {
            state.health_loading = !latest;
        }

        match result {
            Ok(report) => apply(&mut state, report),
            Err(failure) if !latest => {
                debug!(
                    ?ticket,
                    operation,
                    error = %failure,
                    "ignoring failure of superseded report"
                );
            }
            Err(failure) => {
                let message =
                    report_failure(self.inner.notifier.as_ref(), operation, &failure, fallback);
                state.error = Some(message);
            }
        }
    }

    /// Dismisses the current error without touching any other field.
    pub async fn clear_error(&self) {
        self.inner.state.write().await.error = None;
    }
}
