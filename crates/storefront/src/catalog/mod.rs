//! Catalog and organization service client.
//!
//! Uses `reqwest` for HTTP and caches responses with `moka` (TTL from
//! [`StorefrontConfig::cache_ttl`]).
//!
//! # Endpoints
//!
//! - `GET {organization}/api/v1/organizations/id/{id}` - restaurant
//! - `GET {catalog}/api/v1/items/restaurant/{id}` - menu items
//! - `GET {catalog}/api/v1/categories/restaurant/{id}` - categories
//!
//! A missing restaurant is a value ([`MenuPage::NotFound`]), not an error.

mod cache;

use std::sync::Arc;

use dine_core::http::{encode, endpoint, preview};
use dine_core::{Category, MenuItem, Restaurant, RestaurantId};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontConfig;
use crate::menu::{Menu, MenuPage};

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the catalog or organization services.
#[derive(Debug, Error)]
pub enum CatalogError {
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

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the public catalog and organization services.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    catalog_url: Url,
    organization_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization failure).
    pub fn new(config: &StorefrontConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                catalog_url: config.catalog_url.clone(),
                organization_url: config.organization_url.clone(),
                cache,
            }),
        })
    }

    /// GET a JSON resource. `404` yields `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = preview(&response_text);
            tracing::error!(
                status = %status,
                body = %body,
                url = %url,
                "Catalog service returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %preview(&response_text),
                    "Failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Restaurant Methods
    // =========================================================================

    /// Get a restaurant by id. Unknown restaurants yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(restaurant_id = %id))]
    pub async fn restaurant(&self, id: &RestaurantId) -> Result<Option<Restaurant>, CatalogError> {
        let cache_key = CacheKey::Restaurant(id.clone());

        if let Some(CacheValue::Restaurant(restaurant)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for restaurant");
            return Ok(restaurant.map(|r| *r));
        }

        let url = endpoint(
            &self.inner.organization_url,
            &format!("api/v1/organizations/id/{}", encode(id.as_str())),
        );
        let restaurant: Option<Restaurant> = self.get_json(&url).await?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Restaurant(restaurant.clone().map(Box::new)),
            )
            .await;

        Ok(restaurant)
    }

    // =========================================================================
    // Menu Methods
    // =========================================================================

    /// Get every item on a restaurant's menu, including disabled ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn items(&self, restaurant_id: &RestaurantId) -> Result<Vec<MenuItem>, CatalogError> {
        let cache_key = CacheKey::Items(restaurant_id.clone());

        if let Some(CacheValue::Items(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for items");
            return Ok(items);
        }

        let url = endpoint(
            &self.inner.catalog_url,
            &format!("api/v1/items/restaurant/{}", encode(restaurant_id.as_str())),
        );
        let items: Vec<MenuItem> = self.get_json(&url).await?.unwrap_or_default();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Items(items.clone()))
            .await;

        Ok(items)
    }

    /// Get a restaurant's categories in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn categories(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<Category>, CatalogError> {
        let cache_key = CacheKey::Categories(restaurant_id.clone());

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = endpoint(
            &self.inner.catalog_url,
            &format!(
                "api/v1/categories/restaurant/{}",
                encode(restaurant_id.as_str())
            ),
        );
        let categories: Vec<Category> = self.get_json(&url).await?.unwrap_or_default();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Load everything needed to render a restaurant's menu.
    ///
    /// Items and categories are fetched concurrently once the restaurant is
    /// known to exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails or a response is malformed.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn load_menu(&self, restaurant_id: &RestaurantId) -> Result<MenuPage, CatalogError> {
        let Some(restaurant) = self.restaurant(restaurant_id).await? else {
            debug!("Restaurant not found");
            return Ok(MenuPage::NotFound);
        };

        let (items, categories) =
            tokio::try_join!(self.items(restaurant_id), self.categories(restaurant_id))?;

        Ok(MenuPage::Ready(Menu::new(restaurant, categories, items)))
    }

    /// Drop every cached response for a restaurant.
    pub async fn invalidate(&self, restaurant_id: &RestaurantId) {
        for key in [
            CacheKey::Restaurant(restaurant_id.clone()),
            CacheKey::Items(restaurant_id.clone()),
            CacheKey::Categories(restaurant_id.clone()),
        ] {
            self.inner.cache.invalidate(&key).await;
        }
    }
}
