use std::env;
use std::path::PathBuf;
use std::time::Duration;

use autonomo_core::{AppError, AppResult};
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_TOKEN_PATH: &str = ".autonomo/token.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Values given on the command line, taking precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub token_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Runtime configuration of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub token_path: PathBuf,
    pub http_timeout: Duration,
}

impl ConsoleConfig {
    /// Loads configuration from the process environment.
    pub fn load(overrides: ConfigOverrides) -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok(), overrides)
    }

    fn from_lookup<F>(lookup: F, overrides: ConfigOverrides) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = overrides
            .api_base_url
            .or_else(|| non_blank("AUTONOMO_API_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        Url::parse(api_base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "AUTONOMO_API_BASE_URL '{api_base_url}' is not a valid URL: {error}"
            ))
        })?;

        let token_path = overrides
            .token_path
            .or_else(|| non_blank("AUTONOMO_TOKEN_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH));

        let timeout_secs = match overrides.timeout_secs {
            Some(value) => value,
            None => match non_blank("AUTONOMO_HTTP_TIMEOUT_SECS") {
                Some(raw) => raw.parse::<u64>().map_err(|error| {
                    AppError::Validation(format!(
                        "AUTONOMO_HTTP_TIMEOUT_SECS must be a positive integer: {error}"
                    ))
                })?,
                None => DEFAULT_HTTP_TIMEOUT_SECS,
            },
        };

        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "AUTONOMO_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            token_path,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
