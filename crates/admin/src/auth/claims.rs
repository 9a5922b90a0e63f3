//! Access-token claim decoding.
//!
//! Tokens are `header.payload.signature` with base64url-encoded JSON parts.
//! Only the payload is read; signature verification is the backend's job,
//! the client just needs `exp` and the staff roles.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dine_core::StaffRole;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when decoding a token payload.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// The token does not have three dot-separated parts.
    #[error("token is not a three-part JWT")]
    Malformed,

    /// The payload is not valid base64url.
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not the expected JSON.
    #[error("payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims read from an access token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    /// Expiry, Unix seconds.
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default, alias = "authorities")]
    pub roles: Vec<String>,
    /// Everything else in the payload.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Expiry as Unix milliseconds.
    #[must_use]
    pub const fn expires_at_ms(&self) -> i64 {
        self.exp.saturating_mul(1000)
    }

    /// Whether the token has expired at `now_ms`. Strict: expiring exactly
    /// now is still valid.
    #[must_use]
    pub const fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms()
    }

    /// Highest staff role granted, looking at `roles`/`authorities` and at a
    /// Keycloak-style `realm_access.roles`.
    #[must_use]
    pub fn staff_role(&self) -> Option<StaffRole> {
        let realm_roles = self
            .extra
            .get("realm_access")
            .and_then(|v| v.get("roles"))
            .and_then(serde_json::Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(serde_json::Value::as_str);

        self.roles
            .iter()
            .map(String::as_str)
            .chain(realm_roles)
            .filter_map(|role| role.parse::<StaffRole>().ok())
            .max()
    }

    /// Best display name for the signed-in user.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.preferred_username
            .as_deref()
            .or(self.sub.as_deref())
    }
}

/// Decode the claims of a JWT without verifying its signature.
///
/// # Errors
///
/// Returns an error if the token is not three dot-separated parts, or the
/// payload is not base64url-encoded claims JSON with an `exp`.
pub fn decode(token: &str) -> Result<Claims, ClaimsError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ClaimsError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}
