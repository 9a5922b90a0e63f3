//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DINE_CATALOG_URL` - Base URL of the catalog service (items, categories)
//! - `DINE_ORGANIZATION_URL` - Base URL of the organization service (restaurants)
//!
//! ## Optional
//! - `DINE_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `DINE_CACHE_TTL_SECS` - Catalog response cache lifetime (default: 300)
//! - `DINE_CURRENCY` - Currency used when formatting prices (default: INR)

use std::time::Duration;

use dine_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog service base URL
    pub catalog_url: Url,
    /// Organization service base URL
    pub organization_url: Url,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// How long catalog responses stay cached
    pub cache_ttl: Duration,
    /// Currency for displayed prices
    pub currency: CurrencyCode,
}

impl StorefrontConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default cache lifetime (5 minutes).
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

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

        Ok(Self {
            catalog_url: get_required_url("DINE_CATALOG_URL")?,
            organization_url: get_required_url("DINE_ORGANIZATION_URL")?,
            http_timeout: Duration::from_secs(get_env_parsed(
                "DINE_HTTP_TIMEOUT_SECS",
                Self::DEFAULT_TIMEOUT_SECS,
            )?),
            cache_ttl: Duration::from_secs(get_env_parsed(
                "DINE_CACHE_TTL_SECS",
                Self::DEFAULT_CACHE_TTL_SECS,
            )?),
            currency: get_env_parsed("DINE_CURRENCY", CurrencyCode::default())?,
        })
    }

    /// Configuration pointing both services at one base URL, with defaults
    /// for everything else.
    #[must_use]
    pub fn for_base_url(base: Url) -> Self {
        Self {
            catalog_url: base.clone(),
            organization_url: base,
            http_timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(Self::DEFAULT_CACHE_TTL_SECS),
            currency: CurrencyCode::default(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable and parse it as a base URL.
pub(crate) fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    parse_base_url(key, &get_required_env(key)?)
}

/// Parse an http(s) base URL.
pub(crate) fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Get an optional environment variable parsed as `T`, or a default.
fn get_env_parsed<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_accepts_http() {
        let url = parse_base_url("X", "http://localhost:8080").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        let err = parse_base_url("X", "ftp://menu.example").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        assert!(parse_base_url("X", "not a url").is_err());
    }

    #[test]
    fn test_for_base_url_defaults() {
        let config = StorefrontConfig::for_base_url(Url::parse("http://127.0.0.1:9000").unwrap());
        assert_eq!(config.catalog_url, config.organization_url);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.currency, CurrencyCode::INR);
    }

    #[test]
    fn test_missing_env_var_message() {
        let err = get_required_env("DINE_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: DINE_TEST_SURELY_UNSET_VARIABLE"
        );
    }
}
