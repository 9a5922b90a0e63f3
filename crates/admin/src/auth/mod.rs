//! Staff authentication.
//!
//! [`SessionManager`] owns the token lifecycle: login, refresh, expiry,
//! logout and restoring a persisted session on start-up. Its collaborators
//! are ports so tests can swap them:
//!
//! - [`AuthApi`] - the auth/IAM service ([`HttpAuthApi`] in production)
//! - [`SessionStore`] - durable string storage ([`FileStore`], [`MemoryStore`])
//! - [`Clock`] - current time ([`SystemClock`], [`ManualClock`])

mod api;
pub mod claims;
mod clock;
mod session;
mod store;

pub use api::{AuthApi, HttpAuthApi, TokenGrant};
pub use claims::{Claims, ClaimsError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{AuthSession, Bearer, SessionManager, SessionStatus};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError, keys};

use dine_core::UsernameError;
use thiserror::Error;

/// Errors from the token lifecycle.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The username failed validation; nothing was sent.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// The password was empty; nothing was sent.
    #[error("Password is required")]
    MissingPassword,

    /// The auth service refused the credentials.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The auth service answered with something other than a grant.
    #[error("Auth service rejected the request (HTTP {status})")]
    Rejected {
        /// HTTP status code.
        status: u16,
    },

    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The issued access token could not be decoded.
    #[error("Invalid access token: {0}")]
    InvalidToken(#[from] ClaimsError),

    /// No refresh token or username is stored.
    #[error("No refresh token stored")]
    MissingRefreshToken,

    /// The stored refresh token has expired.
    #[error("Refresh token expired")]
    RefreshExpired,

    /// The operation needs a signed-in session.
    #[error("Not signed in")]
    SignedOut,

    /// The session store failed.
    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Whether the input was rejected before any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUsername(_) | Self::MissingPassword)
    }
}

/// Session manager used by the CLI: HTTP auth service, file-backed store,
/// system clock.
pub type StaffSession = SessionManager<HttpAuthApi, FileStore, SystemClock>;

/// Open the persisted staff session described by `config`.
///
/// # Errors
///
/// Returns an error if the session file is unreadable or the HTTP client
/// cannot be built.
pub async fn open_session(config: &crate::AdminConfig) -> Result<StaffSession, AuthError> {
    let store = FileStore::open(&config.session_file)?;
    let api = HttpAuthApi::from_config(config)?;
    SessionManager::restore(api, store, SystemClock).await
}
