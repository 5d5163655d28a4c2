use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use autonomo_core::{AppError, AppResult};
use autonomo_domain::{
    ConfigBatchUpdate, ConfigHistoryItem, ConfigHistoryQuery, ConfigListQuery, ConfigUpdate,
    ConfigValue, DraftState, SystemConfigMap,
};
use tokio::sync::Mutex;

use crate::ports::SystemConfigGateway;
use crate::test_support::{RecordingNotifier, Toast};

use super::SystemConfigStore;

#[derive(Default)]
struct FakeSystemConfigGateway {
    listings: Mutex<VecDeque<AppResult<SystemConfigMap>>>,
    writes: Mutex<VecDeque<AppResult<()>>>,
    listing_delays_ms: Mutex<VecDeque<u64>>,
    write_delays_ms: Mutex<VecDeque<u64>>,
    single_updates: Mutex<Vec<ConfigUpdate>>,
    batch_updates: Mutex<Vec<ConfigBatchUpdate>>,
    list_queries: Mutex<Vec<ConfigListQuery>>,
    history_fails: bool,
}

impl FakeSystemConfigGateway {
    async fn next_write(&self) -> AppResult<()> {
        let write = self.writes.lock().await.pop_front().unwrap_or(Ok(()));
        let delay = self.write_delays_ms.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        write
    }

    async fn next_listing(&self) -> AppResult<SystemConfigMap> {
        let listing = self
            .listings
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(SystemConfigMap::new()));
        let delay = self.listing_delays_ms.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        listing
    }
}

#[async_trait]
impl SystemConfigGateway for FakeSystemConfigGateway {
    async fn list_configs(&self, query: &ConfigListQuery) -> AppResult<SystemConfigMap> {
        self.list_queries.lock().await.push(query.clone());
        self.next_listing().await
    }

    async fn public_configs(&self) -> AppResult<SystemConfigMap> {
        self.next_listing().await
    }

    async fn category_configs(&self, _category: &str) -> AppResult<SystemConfigMap> {
        self.next_listing().await
    }

    async fn config_value(&self, key: &str) -> AppResult<ConfigValue> {
        Err(AppError::Api {
            status: 404,
            detail: Some(format!("Configuração '{key}' não encontrada")),
        })
    }

    async fn update_config(&self, update: &ConfigUpdate) -> AppResult<()> {
        self.single_updates.lock().await.push(update.clone());
        self.next_write().await
    }

    async fn update_configs(&self, update: &ConfigBatchUpdate) -> AppResult<()> {
        self.batch_updates.lock().await.push(update.clone());
        self.next_write().await
    }

    async fn reset_to_defaults(&self) -> AppResult<()> {
        self.next_write().await
    }

    async fn initialize_defaults(&self) -> AppResult<()> {
        self.next_write().await
    }

    async fn history(&self, _query: &ConfigHistoryQuery) -> AppResult<Vec<ConfigHistoryItem>> {
        if self.history_fails {
            return Err(AppError::Transport("offline".to_owned()));
        }
        Ok(vec![ConfigHistoryItem {
            config_key: "app.name".to_owned(),
            config_value: ConfigValue::from("Autonomo Control"),
            value_type: "string".to_owned(),
            category: "app".to_owned(),
            created_at: "2024-01-01T00:00:00".to_owned(),
            updated_at: None,
            is_active: true,
            updated_by: None,
        }])
    }

    async fn categories(&self) -> AppResult<Vec<String>> {
        Ok(vec!["app".to_owned(), "security".to_owned()])
    }
}

fn initial_configs() -> SystemConfigMap {
    SystemConfigMap::from([
        ("app.name".to_owned(), ConfigValue::from("Autonomo Control")),
        ("app.maintenance_mode".to_owned(), ConfigValue::from(false)),
    ])
}

async fn loaded_store(
    gateway: Arc<FakeSystemConfigGateway>,
) -> (SystemConfigStore, Arc<RecordingNotifier>) {
    gateway.listings.lock().await.push_back(Ok(initial_configs()));
    let notifier = Arc::new(RecordingNotifier::default());
    let store = SystemConfigStore::new(gateway, notifier.clone());
    store.load_configs(None).await;
    (store, notifier)
}

#[tokio::test]
async fn update_config_success_merges_value() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    let (store, notifier) = loaded_store(gateway.clone()).await;

    let updated = store
        .update_config("app.name", ConfigValue::from("New Name"))
        .await;

    assert!(updated);
    let state = store.snapshot().await;
    assert_eq!(
        state.configs.get("app.name"),
        Some(&ConfigValue::from("New Name"))
    );
    assert_eq!(state.draft_state("app.name"), DraftState::Clean);
    assert!(!state.updating);
    assert_eq!(
        notifier.toasts(),
        vec![Toast::Success("Configuração atualizada com sucesso".to_owned())]
    );
    assert_eq!(gateway.single_updates.lock().await.len(), 1);
}

#[tokio::test]
async fn update_config_failure_keeps_confirmed_value() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    gateway
        .writes
        .lock()
        .await
        .push_back(Err(AppError::Transport("offline".to_owned())));
    let (store, notifier) = loaded_store(gateway).await;

    let updated = store
        .update_config("app.name", ConfigValue::from("New Name"))
        .await;

    assert!(!updated);
    let state = store.snapshot().await;
    assert_eq!(
        state.configs.get("app.name"),
        Some(&ConfigValue::from("Autonomo Control"))
    );
    assert_eq!(state.draft_state("app.name"), DraftState::Failed);
    assert_eq!(
        state.effective_value("app.name"),
        Some(&ConfigValue::from("New Name"))
    );
    assert_eq!(state.error.as_deref(), Some("Erro ao atualizar configuração"));
    assert_eq!(notifier.errors(), vec!["Erro ao atualizar configuração"]);
    assert!(!state.updating);
}

#[tokio::test]
async fn rejected_batch_update_is_a_failure() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    gateway
        .writes
        .lock()
        .await
        .push_back(Err(AppError::Rejected(
            "Falha ao atualizar algumas configurações".to_owned(),
        )));
    let (store, notifier) = loaded_store(gateway).await;

    let updated = store
        .update_multiple_configs(SystemConfigMap::from([
            ("app.name".to_owned(), ConfigValue::from("Outro")),
            ("app.maintenance_mode".to_owned(), ConfigValue::from(true)),
        ]))
        .await;

    assert!(!updated);
    let state = store.snapshot().await;
    assert_eq!(state.configs, initial_configs());
    assert_eq!(
        notifier.errors(),
        vec!["Falha ao atualizar algumas configurações"]
    );
    assert_eq!(state.draft_state("app.maintenance_mode"), DraftState::Failed);
}

#[tokio::test]
async fn staged_changes_are_saved_in_one_batch() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    let (store, _notifier) = loaded_store(gateway.clone()).await;

    store
        .stage_change("app.name", ConfigValue::from("Outro Nome"))
        .await;
    store
        .stage_change("app.maintenance_mode", ConfigValue::from(true))
        .await;
    assert!(store.snapshot().await.has_unsaved_changes());

    assert!(store.save_changes().await);

    let state = store.snapshot().await;
    assert!(!state.has_unsaved_changes());
    assert!(state.drafts.is_empty());
    assert_eq!(
        state.configs.get("app.maintenance_mode"),
        Some(&ConfigValue::from(true))
    );
    let batches = gateway.batch_updates.lock().await.clone();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].configs.len(), 2);
    assert!(gateway.single_updates.lock().await.is_empty());
}

#[tokio::test]
async fn staging_the_confirmed_value_clears_the_draft() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    let (store, _notifier) = loaded_store(gateway).await;

    store.stage_change("app.name", ConfigValue::from("X")).await;
    assert_eq!(
        store.snapshot().await.draft_state("app.name"),
        DraftState::Dirty
    );

    store
        .stage_change("app.name", ConfigValue::from("Autonomo Control"))
        .await;
    assert_eq!(
        store.snapshot().await.draft_state("app.name"),
        DraftState::Clean
    );
}

#[tokio::test]
async fn save_without_changes_sends_nothing() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    let (store, _notifier) = loaded_store(gateway.clone()).await;

    assert!(store.save_changes().await);
    assert!(gateway.single_updates.lock().await.is_empty());
    assert!(gateway.batch_updates.lock().await.is_empty());
}

#[tokio::test]
async fn reset_reloads_configs_and_drops_drafts() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    let (store, notifier) = loaded_store(gateway.clone()).await;
    store.stage_change("app.name", ConfigValue::from("X")).await;
    gateway.listings.lock().await.push_back(Ok(SystemConfigMap::from([(
        "app.name".to_owned(),
        ConfigValue::from("Padrão"),
    )])));

    assert!(store.reset_to_defaults().await);

    let state = store.snapshot().await;
    assert!(state.drafts.is_empty());
    assert_eq!(state.configs.get("app.name"), Some(&ConfigValue::from("Padrão")));
    assert!(!state.updating);
    assert_eq!(gateway.list_queries.lock().await.len(), 2);
    assert_eq!(
        notifier.toasts(),
        vec![Toast::Success(
            "Configurações restauradas para os valores padrão".to_owned()
        )]
    );
}

#[tokio::test]
async fn initialize_failure_reports_server_detail() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    gateway.writes.lock().await.push_back(Err(AppError::Api {
        status: 409,
        detail: Some("Configurações já inicializadas".to_owned()),
    }));
    let (store, notifier) = loaded_store(gateway).await;

    assert!(!store.initialize_defaults().await);

    let state = store.snapshot().await;
    assert_eq!(state.error.as_deref(), Some("Configurações já inicializadas"));
    assert_eq!(notifier.errors(), vec!["Configurações já inicializadas"]);
    assert_eq!(state.configs, initial_configs());
}

#[tokio::test]
async fn history_failure_is_silent() {
    let gateway = Arc::new(FakeSystemConfigGateway {
        history_fails: true,
        ..FakeSystemConfigGateway::default()
    });
    let (store, notifier) = loaded_store(gateway).await;

    store.load_history(Some("app.name".to_owned()), Some(10)).await;

    let state = store.snapshot().await;
    assert!(state.history.is_empty());
    assert_eq!(state.error, None);
    assert!(notifier.toasts().is_empty());
}

#[tokio::test]
async fn mount_loads_configs_and_categories_once() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    gateway.listings.lock().await.push_back(Ok(initial_configs()));
    let notifier = Arc::new(RecordingNotifier::default());
    let store = SystemConfigStore::new(gateway.clone(), notifier);

    store.mount().await;
    store.mount().await;

    let state = store.snapshot().await;
    assert_eq!(state.configs, initial_configs());
    assert_eq!(state.categories, vec!["app", "security"]);
    assert_eq!(gateway.list_queries.lock().await.len(), 1);
}

#[tokio::test]
async fn fetch_value_reports_missing_key() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    let (store, notifier) = loaded_store(gateway).await;

    assert_eq!(store.fetch_value("app.missing").await, None);
    assert_eq!(
        notifier.errors(),
        vec!["Configuração 'app.missing' não encontrada"]
    );
    assert_eq!(store.snapshot().await.error, None);
}

#[tokio::test]
async fn superseded_listing_failure_is_not_reported() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    {
        let mut listings = gateway.listings.lock().await;
        listings.push_back(Err(AppError::Transport("timeout".to_owned())));
        listings.push_back(Ok(initial_configs()));
    }
    gateway
        .listing_delays_ms
        .lock()
        .await
        .extend([20, 60]);
    let notifier = Arc::new(RecordingNotifier::default());
    let store = SystemConfigStore::new(gateway, notifier.clone());

    let early_store = store.clone();
    let early = tokio::spawn(async move { early_store.load_configs(None).await });
    tokio::time::sleep(Duration::from_millis(5)).await;
    store.load_category("app").await;
    assert!(early.await.is_ok());

    let state = store.snapshot().await;
    assert_eq!(state.error, None);
    assert_eq!(state.configs, initial_configs());
    assert!(!state.loading);
    assert!(notifier.toasts().is_empty());
}

#[tokio::test]
async fn updating_stays_set_until_every_write_settles() {
    let gateway = Arc::new(FakeSystemConfigGateway::default());
    let (store, _notifier) = loaded_store(gateway.clone()).await;
    gateway.write_delays_ms.lock().await.extend([20, 60]);

    let short_store = store.clone();
    let short = tokio::spawn(async move {
        short_store
            .update_config("app.name", ConfigValue::from("Autonomo"))
            .await
    });
    tokio::time::sleep(Duration::from_millis(5)).await;
    let long_store = store.clone();
    let long = tokio::spawn(async move {
        long_store
            .update_config("app.maintenance_mode", ConfigValue::from(true))
            .await
    });
    tokio::time::sleep(Duration::from_millis(35)).await;

    let midway = store.snapshot().await;
    assert!(midway.updating);
    assert_eq!(midway.draft_state("app.name"), DraftState::Clean);
    assert_eq!(midway.draft_state("app.maintenance_mode"), DraftState::Pending);

    let short = short.await.unwrap_or_else(|_| unreachable!());
    let long = long.await.unwrap_or_else(|_| unreachable!());
    assert!(short && long);

    let state = store.snapshot().await;
    assert!(!state.updating);
    assert_eq!(
        state.configs.get("app.maintenance_mode"),
        Some(&ConfigValue::from(true))
    );
}
