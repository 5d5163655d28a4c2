use async_trait::async_trait;
use autonomo_application::SystemConfigGateway;
use autonomo_core::AppResult;
use autonomo_domain::{
    ConfigBatchUpdate, ConfigHistoryItem, ConfigHistoryQuery, ConfigListQuery, ConfigUpdate,
    ConfigValue, SystemConfigMap,
};
use serde::Deserialize;

use crate::api_client::ApiClient;

const RESOURCE: &str = "system-config";

#[derive(Debug, Deserialize)]
struct ConfigEntry {
    value: ConfigValue,
}

/// REST implementation of the system configuration resource.
///
/// Every response of this resource is wrapped in an envelope.
#[derive(Clone)]
pub struct HttpSystemConfigGateway {
    client: ApiClient,
}

impl HttpSystemConfigGateway {
    /// Creates a new system configuration gateway.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SystemConfigGateway for HttpSystemConfigGateway {
    async fn list_configs(&self, query: &ConfigListQuery) -> AppResult<SystemConfigMap> {
        self.client
            .get_enveloped(&[RESOURCE, ""], &query.query_pairs())
            .await
    }

    async fn public_configs(&self) -> AppResult<SystemConfigMap> {
        self.client.get_enveloped(&[RESOURCE, "public"], &[]).await
    }

    async fn category_configs(&self, category: &str) -> AppResult<SystemConfigMap> {
        self.client
            .get_enveloped(&[RESOURCE, "category", category], &[])
            .await
    }

    async fn config_value(&self, key: &str) -> AppResult<ConfigValue> {
        let entry: ConfigEntry = self
            .client
            .get_enveloped(&[RESOURCE, "key", key], &[])
            .await?;
        Ok(entry.value)
    }

    async fn update_config(&self, update: &ConfigUpdate) -> AppResult<()> {
        self.client.put_enveloped(&[RESOURCE, ""], update).await
    }

    async fn update_configs(&self, update: &ConfigBatchUpdate) -> AppResult<()> {
        self.client
            .put_enveloped(&[RESOURCE, "multiple"], update)
            .await
    }

    async fn reset_to_defaults(&self) -> AppResult<()> {
        self.client.post_enveloped(&[RESOURCE, "reset"]).await
    }

    async fn initialize_defaults(&self) -> AppResult<()> {
        self.client.post_enveloped(&[RESOURCE, "initialize"]).await
    }

    async fn history(&self, query: &ConfigHistoryQuery) -> AppResult<Vec<ConfigHistoryItem>> {
        self.client
            .get_enveloped(&[RESOURCE, "history"], &query.query_pairs())
            .await
    }

    async fn categories(&self) -> AppResult<Vec<String>> {
        self.client
            .get_enveloped(&[RESOURCE, "categories"], &[])
            .await
    }
}
