//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DINE_CATALOG_URL` - Base URL of the catalog service (items, categories)
//! - `DINE_ORGANIZATION_URL` - Base URL of the organization service (restaurants)
//! - `DINE_AUTH_URL` - Base URL of the auth/IAM service
//!
//! ## Optional
//! - `DINE_SESSION_FILE` - Where the staff session is persisted (default: `.dine/session.json`)
//! - `DINE_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_SESSION_FILE: &str = ".dine/session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin client configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Catalog service base URL
    pub catalog_url: Url,
    /// Organization service base URL
    pub organization_url: Url,
    /// Auth/IAM service base URL
    pub auth_url: Url,
    /// File backing the durable session store
    pub session_file: PathBuf,
    /// Per-request timeout
    pub http_timeout: Duration,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let http_timeout = match get_optional_env("DINE_HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("DINE_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            catalog_url: get_required_url("DINE_CATALOG_URL")?,
            organization_url: get_required_url("DINE_ORGANIZATION_URL")?,
            auth_url: get_required_url("DINE_AUTH_URL")?,
            session_file: get_optional_env("DINE_SESSION_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    /// Configuration pointing every service at one base URL.
    #[must_use]
    pub fn for_base_url(base: Url, session_file: PathBuf) -> Self {
        Self {
            catalog_url: base.clone(),
            organization_url: base.clone(),
            auth_url: base,
            session_file,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a required environment variable and parse it as an http(s) URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let value = get_required_env(key)?;
    let url = Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
