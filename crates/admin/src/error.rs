//! Unified error handling for admin operations.

use dine_core::ValidationErrors;
use thiserror::Error;

use crate::auth::AuthError;

/// Errors from the admin catalog and organization clients.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Obtaining credentials failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A draft failed validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The service rejected the access token (HTTP 401).
    #[error("Unauthorized: session is no longer valid")]
    Unauthorized,

    /// The caller lacks the role for this operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service answered with an unexpected status.
    #[error("Unexpected HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Rate limited by the service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl AdminError {
    /// Whether the backend rejected the session; callers sign out on this.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
