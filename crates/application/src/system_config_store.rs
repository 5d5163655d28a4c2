use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use autonomo_core::AppResult;
use autonomo_domain::{
    ConfigBatchUpdate, ConfigHistoryItem, ConfigHistoryQuery, ConfigListQuery, ConfigUpdate,
    ConfigValue, DraftState, SystemConfigMap,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::feedback::{report_failure, settle};
use crate::ports::{Notifier, SystemConfigGateway};
use crate::request_sequence::RequestSequence;

const LOAD_CONFIGS_FALLBACK: &str = "Erro ao carregar configurações";
const LOAD_CONFIG_FALLBACK: &str = "Erro ao carregar configuração";
const UPDATE_CONFIG_FALLBACK: &str = "Erro ao atualizar configuração";
const UPDATE_CONFIGS_FALLBACK: &str = "Erro ao atualizar configurações";
const RESET_FALLBACK: &str = "Erro ao restaurar configurações padrão";
const INITIALIZE_FALLBACK: &str = "Erro ao inicializar configurações padrão";

/// Local edit of one configuration key.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDraft {
    /// Value typed by the operator.
    pub value: ConfigValue,
    /// Where the edit is in its lifecycle.
    pub state: DraftState,
}

/// Observable state of the system configuration screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemConfigState {
    /// Last values confirmed by the backend.
    pub configs: SystemConfigMap,
    /// Local edits not yet confirmed. Keys absent here are clean.
    pub drafts: BTreeMap<String, ConfigDraft>,
    /// Known categories.
    pub categories: Vec<String>,
    /// Last loaded change history.
    pub history: Vec<ConfigHistoryItem>,
    /// A listing request is in flight.
    pub loading: bool,
    /// A write request is in flight.
    pub updating: bool,
    /// Message of the last failure not yet dismissed.
    pub error: Option<String>,
}

impl SystemConfigState {
    /// Returns the draft state of `key`.
    #[must_use]
    pub fn draft_state(&self, key: &str) -> DraftState {
        self.drafts
            .get(key)
            .map_or(DraftState::Clean, |draft| draft.state)
    }

    /// Returns the value to display for `key`: the draft when one exists,
    /// otherwise the confirmed value.
    #[must_use]
    pub fn effective_value(&self, key: &str) -> Option<&ConfigValue> {
        self.drafts
            .get(key)
            .map(|draft| &draft.value)
            .or_else(|| self.configs.get(key))
    }

    /// Returns true when any draft awaits saving.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.drafts
            .values()
            .any(|draft| matches!(draft.state, DraftState::Dirty | DraftState::Failed))
    }
}

struct SystemConfigStoreInner {
    gateway: Arc<dyn SystemConfigGateway>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SystemConfigState>,
    configs_sequence: RequestSequence,
    writes_in_flight: AtomicUsize,
    mounted: AtomicBool,
}

/// System configuration screen state plus the actions that drive it.
#[derive(Clone)]
pub struct SystemConfigStore {
    inner: Arc<SystemConfigStoreInner>,
}

impl SystemConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(gateway: Arc<dyn SystemConfigGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(SystemConfigStoreInner {
                gateway,
                notifier,
                state: RwLock::new(SystemConfigState::default()),
                configs_sequence: RequestSequence::new(),
                writes_in_flight: AtomicUsize::new(0),
                mounted: AtomicBool::new(false),
            }),
        }
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> SystemConfigState {
        self.inner.state.read().await.clone()
    }

    /// Runs the initial listing and category fetch. Later calls are no-ops.
    pub async fn mount(&self) {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return;
        }

        tokio::join!(self.load_configs(None), self.load_categories());
    }

    /// Replaces `configs` with the listing, optionally narrowed to a category.
    pub async fn load_configs(&self, category: Option<String>) {
        let query = ConfigListQuery {
            category,
            public_only: None,
        };
        let gateway = Arc::clone(&self.inner.gateway);
        self.replace_configs("system_config.load", async move {
            gateway.list_configs(&query).await
        })
        .await;
    }

    /// Replaces `configs` with the public values only.
    pub async fn load_public_configs(&self) {
        let gateway = Arc::clone(&self.inner.gateway);
        self.replace_configs("system_config.load_public", async move {
            gateway.public_configs().await
        })
        .await;
    }

    /// Replaces `configs` with the values of one category.
    pub async fn load_category(&self, category: &str) {
        let gateway = Arc::clone(&self.inner.gateway);
        let category = category.to_owned();
        self.replace_configs("system_config.load_category", async move {
            gateway.category_configs(&category).await
        })
        .await;
    }

    async fn replace_configs<F>(&self, operation: &'static str, request: F)
    where
        F: Future<Output = AppResult<SystemConfigMap>>,
    {
        let ticket = self.inner.configs_sequence.issue();
        {
            let mut state = self.inner.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = request.await;

        let mut state = self.inner.state.write().await;
        if !self.inner.configs_sequence.try_apply(ticket) {
            debug!(?ticket, operation, "discarding stale configuration listing");
            return;
        }
        let latest = self.inner.configs_sequence.is_latest(ticket);
        state.loading = !latest;

        match result {
            Ok(configs) => state.configs = configs,
            Err(failure) if !latest => {
                debug!(
                    ?ticket,
                    operation,
                    error = %failure,
                    "ignoring failure of superseded configuration listing"
                );
            }
            Err(failure) => {
                let message = report_failure(
                    self.inner.notifier.as_ref(),
                    operation,
                    &failure,
                    LOAD_CONFIGS_FALLBACK,
                );
                state.error = Some(message);
            }
        }
    }

    /// Fetches the current value of one key without touching state.
    pub async fn fetch_value(&self, key: &str) -> Option<ConfigValue> {
        let result = self.inner.gateway.config_value(key).await;
        settle(
            self.inner.notifier.as_ref(),
            "system_config.get",
            result,
            LOAD_CONFIG_FALLBACK,
        )
    }

    /// Records a local edit of `key`.
    pub async fn stage_change(&self, key: &str, value: ConfigValue) {
        let mut state = self.inner.state.write().await;
        if state.configs.get(key) == Some(&value) {
            state.drafts.remove(key);
            return;
        }

        state.drafts.insert(
            key.to_owned(),
            ConfigDraft {
                value,
                state: DraftState::Dirty,
            },
        );
    }

    /// Drops every local edit.
    pub async fn discard_changes(&self) {
        self.inner.state.write().await.drafts.clear();
    }

    /// Sends every dirty or failed draft. Returns true when nothing was left
    /// unsaved.
    pub async fn save_changes(&self) -> bool {
        let pending: SystemConfigMap = {
            let state = self.inner.state.read().await;
            state
                .drafts
                .iter()
                .filter(|(_, draft)| matches!(draft.state, DraftState::Dirty | DraftState::Failed))
                .map(|(key, draft)| (key.clone(), draft.value.clone()))
                .collect()
        };

        let mut entries = pending.into_iter();
        match (entries.next(), entries.len()) {
            (None, _) => true,
            (Some((key, value)), 0) => self.update_config(&key, value).await,
            (Some(first), _) => {
                let mut configs: SystemConfigMap = entries.collect();
                configs.insert(first.0, first.1);
                self.update_multiple_configs(configs).await
            }
        }
    }

    /// Writes one key. On success the confirmed value is merged into `configs`;
    /// on failure `configs` keeps the previous value and the draft is marked
    /// failed.
    pub async fn update_config(&self, key: &str, value: ConfigValue) -> bool {
        self.begin_write(std::iter::once((key, &value))).await;

        let update = ConfigUpdate {
            key: key.to_owned(),
            value: value.clone(),
        };
        match self.inner.gateway.update_config(&update).await {
            Ok(()) => {
                info!(key, "configuration updated");
                {
                    let mut state = self.inner.state.write().await;
                    state.configs.insert(key.to_owned(), value);
                    state.drafts.remove(key);
                    self.end_write(&mut state);
                }
                self.inner
                    .notifier
                    .success("Configuração atualizada com sucesso");
                true
            }
            Err(failure) => {
                let message = report_failure(
                    self.inner.notifier.as_ref(),
                    "system_config.update",
                    &failure,
                    UPDATE_CONFIG_FALLBACK,
                );
                self.fail_write(std::iter::once(key), message).await;
                false
            }
        }
    }

    /// Writes several keys in one request with the same merge rules as
    /// [`SystemConfigStore::update_config`].
    pub async fn update_multiple_configs(&self, configs: SystemConfigMap) -> bool {
        self.begin_write(configs.iter().map(|(key, value)| (key.as_str(), value)))
            .await;

        let update = ConfigBatchUpdate {
            configs: configs.clone(),
        };
        match self.inner.gateway.update_configs(&update).await {
            Ok(()) => {
                info!(count = configs.len(), "configurations updated");
                {
                    let mut state = self.inner.state.write().await;
                    for (key, value) in configs {
                        state.drafts.remove(&key);
                        state.configs.insert(key, value);
                    }
                    self.end_write(&mut state);
                }
                self.inner
                    .notifier
                    .success("Configurações atualizadas com sucesso");
                true
            }
            Err(failure) => {
                let message = report_failure(
                    self.inner.notifier.as_ref(),
                    "system_config.update_multiple",
                    &failure,
                    UPDATE_CONFIGS_FALLBACK,
                );
                self.fail_write(configs.keys().map(String::as_str), message)
                    .await;
                false
            }
        }
    }

    async fn begin_write<'a>(&self, entries: impl Iterator<Item = (&'a str, &'a ConfigValue)>) {
        let mut state = self.inner.state.write().await;
        self.inner.writes_in_flight.fetch_add(1, Ordering::SeqCst);
        state.updating = true;
        state.error = None;
        for (key, value) in entries {
            state.drafts.insert(
                key.to_owned(),
                ConfigDraft {
                    value: value.clone(),
                    state: DraftState::Pending,
                },
            );
        }
    }

    async fn fail_write<'a>(&self, keys: impl Iterator<Item = &'a str>, message: String) {
        let mut state = self.inner.state.write().await;
        for key in keys {
            if let Some(draft) = state.drafts.get_mut(key) {
                draft.state = DraftState::Failed;
            }
        }
        state.error = Some(message);
        self.end_write(&mut state);
    }

    /// `updating` stays set while any other write is still in flight.
    fn end_write(&self, state: &mut SystemConfigState) {
        let remaining = self
            .inner
            .writes_in_flight
            .fetch_sub(1, Ordering::SeqCst)
            .saturating_sub(1);
        state.updating = remaining > 0;
    }

    /// Restores every key to its default and reloads.
    pub async fn reset_to_defaults(&self) -> bool {
        let gateway = Arc::clone(&self.inner.gateway);
        self.run_bulk_action(
            "system_config.reset",
            async move { gateway.reset_to_defaults().await },
            "Configurações restauradas para os valores padrão",
            RESET_FALLBACK,
        )
        .await
    }

    /// Creates missing default keys and reloads.
    pub async fn initialize_defaults(&self) -> bool {
        let gateway = Arc::clone(&self.inner.gateway);
        self.run_bulk_action(
            "system_config.initialize",
            async move { gateway.initialize_defaults().await },
            "Configurações padrão inicializadas com sucesso",
            INITIALIZE_FALLBACK,
        )
        .await
    }

    async fn run_bulk_action<F>(
        &self,
        operation: &'static str,
        request: F,
        success_message: &str,
        fallback: &str,
    ) -> bool
    where
        F: Future<Output = AppResult<()>>,
    {
        {
            let mut state = self.inner.state.write().await;
            self.inner.writes_in_flight.fetch_add(1, Ordering::SeqCst);
            state.updating = true;
            state.error = None;
        }

        let succeeded = match request.await {
            Ok(()) => {
                info!(operation, "bulk configuration action completed");
                self.inner.state.write().await.drafts.clear();
                self.inner.notifier.success(success_message);
                self.load_configs(None).await;
                true
            }
            Err(failure) => {
                let message =
                    report_failure(self.inner.notifier.as_ref(), operation, &failure, fallback);
                self.inner.state.write().await.error = Some(message);
                false
            }
        };

        let mut state = self.inner.state.write().await;
        self.end_write(&mut state);
        succeeded
    }

    /// Loads change history. Failures are only logged.
    pub async fn load_history(&self, key: Option<String>, limit: Option<u32>) {
        let query = ConfigHistoryQuery { key, limit };
        match self.inner.gateway.history(&query).await {
            Ok(history) => self.inner.state.write().await.history = history,
            Err(error) => warn!(error = %error, "failed to load configuration history"),
        }
    }

    /// Loads known categories. Failures are only logged.
    pub async fn load_categories(&self) {
        match self.inner.gateway.categories().await {
            Ok(categories) => self.inner.state.write().await.categories = categories,
            Err(error) => warn!(error = %error, "failed to load configuration categories"),
        }
    }

    /// Dismisses the current error without touching any other field.
    pub async fn clear_error(&self) {
        self.inner.state.write().await.error = None;
    }
}

#[cfg(test)]
mod tests;
