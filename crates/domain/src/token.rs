//! Client-side classification of stored bearer tokens.
//!
//! The signature is never verified here; the backend remains the authority.
//! The check only decides whether a stored token is worth sending.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Result of inspecting a stored JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Structurally sound and not yet expired.
    Valid {
        /// Expiry instant from the `exp` claim.
        expires_at: DateTime<Utc>,
    },
    /// Structurally sound but `exp` is not in the future.
    Expired,
    /// Not a decodable three-part JWT with a numeric `exp`, or an `exp`
    /// outside the representable date range.
    Malformed,
}

impl TokenStatus {
    /// Returns true for [`TokenStatus::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Classifies `token` against `now`.
#[must_use]
pub fn inspect_token(token: &str, now: DateTime<Utc>) -> TokenStatus {
    let Some(expires_at) = expiry_of(token) else {
        return TokenStatus::Malformed;
    };

    if expires_at <= now {
        TokenStatus::Expired
    } else {
        TokenStatus::Valid { expires_at }
    }
}

fn expiry_of(token: &str) -> Option<DateTime<Utc>> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 || segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .ok()?;
    let claims = serde_json::from_slice::<Value>(&payload).ok()?;
    let exp = claims.as_object()?.get("exp")?;
    let seconds = exp
        .as_i64()
        .or_else(|| exp.as_f64().map(|value| value.trunc() as i64))?;

    DateTime::<Utc>::from_timestamp(seconds, 0)
}
