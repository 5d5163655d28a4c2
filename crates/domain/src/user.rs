//! User accounts as seen by the admin console.

use autonomo_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::query::push_defined;

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length accepted at registration.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Requires exactly one `@`, a non-empty local part and a dotted domain.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let normalized = value.into().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain '@'".to_owned(),
            ));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(AppError::Validation(
                "email address must have one '@' and a local part".to_owned(),
            ));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Account profile returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role label (`USER`, `ADMIN`, `MASTER`).
    #[serde(default)]
    pub role: Option<String>,
    /// Whether the account may sign in.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Creation instant.
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Response of the token endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer JWT.
    pub access_token: String,
    /// Token scheme, `bearer`.
    pub token_type: String,
    /// Profile of the authenticated user.
    pub user: User,
}

/// Payload for account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Plaintext password, sent once over TLS.
    pub password: String,
}

impl CreateUserInput {
    /// Validates and normalizes the payload before it is sent.
    pub fn validated(self) -> AppResult<Self> {
        let email = EmailAddress::new(self.email)?;
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_owned()));
        }

        let password_length = self.password.chars().count();
        if password_length < PASSWORD_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "password must be at least {PASSWORD_MIN_LENGTH} characters"
            )));
        }

        if password_length > PASSWORD_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "password must not exceed {PASSWORD_MAX_LENGTH} characters"
            )));
        }

        Ok(Self {
            email: email.into(),
            name,
            password: self.password,
        })
    }
}

/// Query parameters for the admin user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserFilter {
    /// Rows skipped.
    pub skip: Option<u32>,
    /// Maximum rows returned.
    pub limit: Option<u32>,
    /// Free text matched against name and email.
    pub search: Option<String>,
    /// Role filter.
    pub role: Option<String>,
    /// Status filter.
    pub is_active: Option<bool>,
}

impl Default for AdminUserFilter {
    fn default() -> Self {
        Self {
            skip: Some(0),
            limit: Some(100),
            search: None,
            role: None,
            is_active: None,
        }
    }
}

impl AdminUserFilter {
    /// Returns defined parameters in wire order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_defined(&mut pairs, "skip", self.skip.map(|value| value.to_string()));
        push_defined(&mut pairs, "limit", self.limit.map(|value| value.to_string()));
        push_defined(&mut pairs, "search", self.search.clone());
        push_defined(&mut pairs, "role", self.role.clone());
        push_defined(
            &mut pairs,
            "is_active",
            self.is_active.map(|value| value.to_string()),
        );
        pairs
    }
}

/// Body of the account status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatusUpdate {
    /// New active flag.
    pub is_active: bool,
}
