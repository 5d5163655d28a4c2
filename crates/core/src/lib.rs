//! Shared primitives for all Rust crates in the Autonomo admin console.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Autonomo crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Flat classification of [`AppError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected before any request was issued.
    Validation,
    /// Requested resource does not exist.
    NotFound,
    /// Session missing, expired or rejected by the backend.
    Unauthorized,
    /// Authenticated but not allowed.
    Forbidden,
    /// Backend answered with a non-success status.
    Server,
    /// Backend answered successfully but reported `success: false`.
    Rejected,
    /// Request never produced a response.
    Transport,
    /// Response body could not be decoded.
    Decode,
    /// Internal unexpected error.
    Internal,
}

impl ErrorKind {
    /// Returns a stable label for logs and console output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Server => "server",
            Self::Rejected => "rejected",
            Self::Transport => "transport",
            Self::Decode => "decode",
            Self::Internal => "internal",
        }
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// User is not authenticated or the session expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Backend returned an error status, optionally with a `detail` message.
    #[error("server returned status {status}{}", format_detail(.detail))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-supplied `detail` field, when the body carried one.
        detail: Option<String>,
    },

    /// Backend envelope reported `success: false`.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Request failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the flat error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Api { .. } => ErrorKind::Server,
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the message the backend supplied for this failure, if any.
    #[must_use]
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            Self::Api {
                detail: Some(detail),
                ..
            } => Some(detail.as_str()),
            Self::Unauthorized(message) | Self::Rejected(message)
                if !message.trim().is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Returns the text shown to the operator: the server detail when present,
    /// otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_detail().unwrap_or(fallback).to_owned()
    }
}

fn format_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{AppError, ErrorKind, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn user_message_prefers_server_detail() {
        let error = AppError::Api {
            status: 400,
            detail: Some("Chave inválida".to_owned()),
        };

        assert_eq!(error.user_message("fallback"), "Chave inválida");
        assert_eq!(error.kind(), ErrorKind::Server);
    }

    #[test]
    fn user_message_falls_back_without_detail() {
        let transport = AppError::Transport("connection refused".to_owned());
        let bare_status = AppError::Api {
            status: 500,
            detail: None,
        };

        assert_eq!(
            transport.user_message("Erro ao carregar logs de auditoria"),
            "Erro ao carregar logs de auditoria"
        );
        assert_eq!(bare_status.user_message("fallback"), "fallback");
    }

    #[test]
    fn rejected_envelope_message_is_surfaced() {
        let error = AppError::Rejected("Algumas configurações falharam".to_owned());
        assert_eq!(error.user_message("fallback"), "Algumas configurações falharam");

        let empty = AppError::Rejected(String::new());
        assert_eq!(empty.user_message("fallback"), "fallback");
    }

    #[test]
    fn unauthorized_message_is_surfaced() {
        let error = AppError::Unauthorized("Email ou senha incorretos".to_owned());
        assert_eq!(error.user_message("fallback"), "Email ou senha incorretos");
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn api_error_display_includes_detail() {
        let error = AppError::Api {
            status: 404,
            detail: Some("missing".to_owned()),
        };
        assert_eq!(error.to_string(), "server returned status 404: missing");
    }
}
