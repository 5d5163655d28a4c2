//! Shared HTTP client for the Autonomo REST API.

use std::sync::Arc;
use std::time::Duration;

use autonomo_application::TokenStore;
use autonomo_core::{AppError, AppResult};
use autonomo_domain::encode_query;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

const SESSION_EXPIRED_MESSAGE: &str = "Sessão expirada. Faça login novamente.";
const REJECTED_FALLBACK_MESSAGE: &str = "Operação rejeitada pelo servidor";

/// `{success, data, message}` wrapper used by the configuration resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// Whether the backend completed the operation.
    pub success: bool,
    /// Payload, absent for write operations.
    #[serde(default)]
    pub data: Option<T>,
    /// Human-readable outcome.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the payload of a successful envelope.
    pub fn into_data(self) -> AppResult<T> {
        let data = self.into_outcome()?;
        data.ok_or_else(|| AppError::Decode("envelope is missing the data field".to_owned()))
    }

    /// Succeeds when the envelope reports success, ignoring any payload.
    pub fn into_unit(self) -> AppResult<()> {
        self.into_outcome().map(|_| ())
    }

    fn into_outcome(self) -> AppResult<Option<T>> {
        if self.success {
            return Ok(self.data);
        }

        Err(AppError::Rejected(
            self.message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_owned()),
        ))
    }
}

/// HTTP client bound to one API base URL.
///
/// Every request carries the stored bearer token. A 401 response removes the
/// stored token so the next command starts from the login screen.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Creates a client with its own connection pool and request timeout.
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Self::with_client(http_client, base_url, tokens)
    }

    /// Creates a client on top of an existing reqwest client.
    pub fn with_client(
        http_client: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|error| {
            AppError::Validation(format!("invalid API base URL '{base_url}': {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "API base URL '{base_url}' cannot carry paths"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            tokens,
        })
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves path segments and query pairs against the base URL.
    ///
    /// Segments are percent-encoded; an empty last segment yields a trailing `/`.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("API base URL cannot carry paths".to_owned()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.set_query(Some(encode_query(query).as_str()));
        }

        Ok(url)
    }

    /// Sends a `GET` request.
    pub async fn get<T>(&self, segments: &[&str], query: &[(&str, String)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, query)?;
        self.send(self.http_client.request(Method::GET, url)).await
    }

    /// Sends a `DELETE` request.
    pub async fn delete<T>(&self, segments: &[&str], query: &[(&str, String)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, query)?;
        self.send(self.http_client.request(Method::DELETE, url)).await
    }

    /// Sends a `POST` request with a JSON body.
    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        self.send(self.http_client.request(Method::POST, url).json(body))
            .await
    }

    /// Sends a `POST` request with a form-encoded body.
    pub async fn post_form<T>(&self, segments: &[&str], form: &[(&str, &str)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        self.send(self.http_client.request(Method::POST, url).form(form))
            .await
    }

    /// Sends a `PUT` request with a JSON body.
    pub async fn put_json<B, T>(&self, segments: &[&str], body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        self.send(self.http_client.request(Method::PUT, url).json(body))
            .await
    }

    /// Sends a `PATCH` request with a JSON body.
    pub async fn patch_json<B, T>(&self, segments: &[&str], body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        self.send(self.http_client.request(Method::PATCH, url).json(body))
            .await
    }

    /// Sends a `GET` request and unwraps the response envelope.
    pub async fn get_enveloped<T>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        self.get::<ApiEnvelope<T>>(segments, query)
            .await?
            .into_data()
    }

    /// Sends a `PUT` request whose envelope carries no payload of interest.
    pub async fn put_enveloped<B>(&self, segments: &[&str], body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.put_json::<B, ApiEnvelope<Value>>(segments, body)
            .await?
            .into_unit()
    }

    /// Sends a bodiless `POST` request whose envelope carries no payload of
    /// interest.
    pub async fn post_enveloped(&self, segments: &[&str]) -> AppResult<()> {
        let url = self.endpoint(segments, &[])?;
        self.send::<ApiEnvelope<Value>>(self.http_client.request(Method::POST, url))
            .await?
            .into_unit()
    }

    async fn send<T>(&self, request: RequestBuilder) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let request = match self.tokens.load().await {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(error) => {
                warn!(error = %error, "failed to read stored token; sending anonymous request");
                request
            }
        };

        let response = request
            .send()
            .await
            .map_err(|error| AppError::Transport(format!("request failed: {error}")))?;
        let status = response.status();
        let url = response.url().clone();
        debug!(%url, status = status.as_u16(), "API response received");

        let body = response.bytes().await.map_err(|error| {
            AppError::Transport(format!("failed to read response body from {url}: {error}"))
        })?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.reject_session(&url, &body).await);
        }

        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        serde_json::from_slice::<T>(&body).map_err(|error| {
            AppError::Decode(format!("unexpected response body from {url}: {error}"))
        })
    }

    async fn reject_session(&self, url: &Url, body: &[u8]) -> AppError {
        warn!(%url, "backend rejected the session; stored token removed, sign in again");
        if let Err(error) = self.tokens.clear().await {
            warn!(error = %error, "failed to remove rejected token");
        }

        AppError::Unauthorized(
            error_detail(body).unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_owned()),
        )
    }
}

/// Extracts the `detail` field of an error body.
///
/// Validation errors carry a list of `{msg}` objects; their messages are joined.
fn error_detail(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
