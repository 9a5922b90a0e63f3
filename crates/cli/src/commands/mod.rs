//! Command implementations.

pub mod categories;
pub mod items;
pub mod menu;
pub mod restaurants;
pub mod session;

use dine_admin::auth::AuthError;
use dine_admin::{AdminClient, AdminConfig, AdminError, Bearer, StaffSession, open_session};
use thiserror::Error;

/// Errors from staff commands.
#[derive(Debug, Error)]
pub enum StaffError {
    #[error(transparent)]
    Config(#[from] dine_admin::ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Admin(#[from] AdminError),

    /// No usable session.
    #[error("Not signed in; run `dine login <username>` first")]
    NotSignedIn,

    /// A category selection matched nothing.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Neither `DINE_PASSWORD` nor stdin supplied a password.
    #[error("No password given; set DINE_PASSWORD or use --password-stdin")]
    MissingPassword,

    #[error("Failed to read password: {0}")]
    PasswordInput(#[from] std::io::Error),
}

/// Staff command context: configuration, API client and restored session.
pub struct Staff {
    pub client: AdminClient,
    pub session: StaffSession,
}

impl Staff {
    /// Load configuration and restore the persisted session.
    pub async fn connect() -> Result<Self, StaffError> {
        let config = AdminConfig::from_env()?;
        let client = AdminClient::new(&config)?;
        let session = open_session(&config).await?;
        Ok(Self { client, session })
    }

    /// Credentials for the next request.
    pub async fn bearer(&mut self) -> Result<Bearer, StaffError> {
        self.session.bearer().await.map_err(|e| match e {
            AuthError::SignedOut | AuthError::MissingRefreshToken | AuthError::RefreshExpired => {
                StaffError::NotSignedIn
            }
            other => StaffError::Auth(other),
        })
    }

    /// Pass a result through, signing out if the backend rejected the token.
    pub fn checked<T>(&mut self, result: Result<T, AdminError>) -> Result<T, StaffError> {
        result.map_err(|e| {
            if e.is_unauthorized() {
                tracing::warn!("Access token rejected, signing out");
                self.session.logout();
                StaffError::NotSignedIn
            } else {
                StaffError::Admin(e)
            }
        })
    }
}
