use async_trait::async_trait;
use autonomo_core::AppResult;
use autonomo_domain::{
    ConfigBatchUpdate, ConfigHistoryItem, ConfigHistoryQuery, ConfigListQuery, ConfigUpdate,
    ConfigValue, SystemConfigMap,
};

/// Port for the system configuration REST resource.
#[async_trait]
pub trait SystemConfigGateway: Send + Sync {
    /// Lists configuration values, optionally narrowed by category or visibility.
    async fn list_configs(&self, query: &ConfigListQuery) -> AppResult<SystemConfigMap>;

    /// Lists values flagged public.
    async fn public_configs(&self) -> AppResult<SystemConfigMap>;

    /// Lists values of one category.
    async fn category_configs(&self, category: &str) -> AppResult<SystemConfigMap>;

    /// Returns the value of one key.
    async fn config_value(&self, key: &str) -> AppResult<ConfigValue>;

    /// Writes one key.
    async fn update_config(&self, update: &ConfigUpdate) -> AppResult<()>;

    /// Writes several keys in one request.
    async fn update_configs(&self, update: &ConfigBatchUpdate) -> AppResult<()>;

    /// Restores every key to its default.
    async fn reset_to_defaults(&self) -> AppResult<()>;

    /// Creates missing keys with their defaults.
    async fn initialize_defaults(&self) -> AppResult<()>;

    /// Lists change history.
    async fn history(&self, query: &ConfigHistoryQuery) -> AppResult<Vec<ConfigHistoryItem>>;

    /// Lists known categories.
    async fn categories(&self) -> AppResult<Vec<String>>;
}
