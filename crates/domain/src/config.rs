use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use autonomo_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::query::push_defined;

/// Scalar value stored under one dotted configuration key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicitly unset value.
    Null,
    /// Boolean flag.
    Boolean(bool),
    /// Integer or floating point number.
    Number(Number),
    /// Free text.
    Text(String),
}

impl ConfigValue {
    /// Parses operator input according to the expected field type.
    pub fn parse_as(field_type: ConfigFieldType, raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        match field_type {
            ConfigFieldType::String => Ok(Self::Text(raw.to_owned())),
            ConfigFieldType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "sim" => Ok(Self::Boolean(true)),
                "false" | "0" | "no" | "nao" | "não" => Ok(Self::Boolean(false)),
                _ => Err(AppError::Validation(format!(
                    "'{raw}' is not a boolean value"
                ))),
            },
            ConfigFieldType::Number => {
                if let Ok(integer) = trimmed.parse::<i64>() {
                    return Ok(Self::Number(Number::from(integer)));
                }

                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Self::Number)
                    .ok_or_else(|| AppError::Validation(format!("'{raw}' is not a number")))
            }
        }
    }

    /// Returns the field type implied by the value itself.
    #[must_use]
    pub fn inferred_type(&self) -> ConfigFieldType {
        match self {
            Self::Boolean(_) => ConfigFieldType::Boolean,
            Self::Number(_) => ConfigFieldType::Number,
            Self::Null | Self::Text(_) => ConfigFieldType::String,
        }
    }
}

impl Display for ConfigValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Boolean(value) => write!(formatter, "{value}"),
            Self::Number(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

/// Configuration snapshot keyed by dotted key (`app.name`).
pub type SystemConfigMap = BTreeMap<String, ConfigValue>;

/// Input control used to edit one configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigFieldType {
    /// Free text input.
    String,
    /// Numeric input.
    Number,
    /// Toggle.
    Boolean,
}

impl ConfigFieldType {
    /// Returns stable label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

const KNOWN_FIELD_TYPES: &[(&str, ConfigFieldType)] = &[
    ("app.name", ConfigFieldType::String),
    ("app.version", ConfigFieldType::String),
    ("app.description", ConfigFieldType::String),
    ("app.maintenance_mode", ConfigFieldType::Boolean),
    ("app.support_email", ConfigFieldType::String),
    ("security.session_timeout", ConfigFieldType::Number),
    ("security.max_login_attempts", ConfigFieldType::Number),
    ("security.password_min_length", ConfigFieldType::Number),
    ("security.require_email_verification", ConfigFieldType::Boolean),
    ("email.enabled", ConfigFieldType::Boolean),
    ("email.smtp_host", ConfigFieldType::String),
    ("email.smtp_port", ConfigFieldType::Number),
    ("email.from_address", ConfigFieldType::String),
    ("features.registration_enabled", ConfigFieldType::Boolean),
    ("features.google_login_enabled", ConfigFieldType::Boolean),
    ("limits.max_transactions_per_month", ConfigFieldType::Number),
    ("limits.max_categories", ConfigFieldType::Number),
    ("audit.retention_days", ConfigFieldType::Number),
];

/// Returns the input type for `key`, falling back to the value's own type for
/// keys outside the known table.
#[must_use]
pub fn field_type_for(key: &str, value: &ConfigValue) -> ConfigFieldType {
    KNOWN_FIELD_TYPES
        .iter()
        .find(|(known_key, _)| *known_key == key)
        .map(|(_, field_type)| *field_type)
        .unwrap_or_else(|| value.inferred_type())
}

/// Returns the category prefix of a dotted key (`app` for `app.name`).
#[must_use]
pub fn config_category(key: &str) -> &str {
    key.split_once('.').map_or(key, |(category, _)| category)
}

/// Author of a configuration change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEditor {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Append-only record of one configuration change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigHistoryItem {
    /// Dotted key.
    pub config_key: String,
    /// Value written by this change.
    pub config_value: ConfigValue,
    /// Backend type label.
    pub value_type: String,
    /// Category label.
    pub category: String,
    /// Creation instant.
    pub created_at: String,
    /// Last update instant.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Whether this revision is the active one.
    pub is_active: bool,
    /// Editor, when known.
    #[serde(default)]
    pub updated_by: Option<ConfigEditor>,
}

/// Body of a single-key update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    /// Dotted key.
    pub key: String,
    /// New value.
    pub value: ConfigValue,
}

/// Body of a multi-key update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigBatchUpdate {
    /// Keys and values to write.
    pub configs: SystemConfigMap,
}

/// Query for configuration listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigListQuery {
    /// Restricts the listing to one category.
    pub category: Option<String>,
    /// Restricts the listing to public keys.
    pub public_only: Option<bool>,
}

impl ConfigListQuery {
    /// Returns defined parameters in wire order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_defined(&mut pairs, "category", self.category.clone());
        push_defined(
            &mut pairs,
            "public_only",
            self.public_only.map(|public_only| public_only.to_string()),
        );
        pairs
    }
}

/// Query for configuration history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigHistoryQuery {
    /// Restricts history to one key.
    pub key: Option<String>,
    /// Maximum rows returned.
    pub limit: Option<u32>,
}

impl ConfigHistoryQuery {
    /// Returns defined parameters in wire order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_defined(&mut pairs, "key", self.key.clone());
        push_defined(&mut pairs, "limit", self.limit.map(|limit| limit.to_string()));
        pairs
    }
}

/// Lifecycle of a locally edited configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    /// Matches the last confirmed server value.
    Clean,
    /// Edited locally, not yet sent.
    Dirty,
    /// Sent, awaiting confirmation.
    Pending,
    /// Rejected by the backend; the confirmed value was kept.
    Failed,
}
