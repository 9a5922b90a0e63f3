//! Menu item management.
//!
//! # Endpoints
//!
//! - `GET {catalog}/api/v1/items/restaurant/{restaurant_id}`
//! - `GET|PUT|DELETE {catalog}/api/v1/items/{id}`
//! - `POST {catalog}/api/v1/items`
//! - `PUT {catalog}/api/v1/items/{id}/status` - `{enabled}`

use dine_core::{ItemDraft, ItemId, MenuItem, RestaurantId};
use dine_core::http::encode;
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{AdminClient, NO_BODY};
use crate::auth::Bearer;
use crate::error::AdminError;

#[derive(Serialize)]
struct StatusUpdate {
    enabled: bool,
}

impl AdminClient {
    /// Every item of a restaurant, enabled or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, bearer), fields(restaurant_id = %restaurant_id))]
    pub async fn items(
        &self,
        bearer: &Bearer,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<MenuItem>, AdminError> {
        let url = self.catalog(&format!(
            "api/v1/items/restaurant/{}",
            encode(restaurant_id.as_str())
        ));
        Ok(self
            .fetch(Method::GET, &url, bearer, NO_BODY)
            .await?
            .unwrap_or_default())
    }

    /// Get an item by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, bearer), fields(item_id = %id))]
    pub async fn item(&self, bearer: &Bearer, id: &ItemId) -> Result<Option<MenuItem>, AdminError> {
        let url = self.catalog(&format!("api/v1/items/{}", encode(id.as_str())));
        self.fetch(Method::GET, &url, bearer, NO_BODY).await
    }

    /// Create an item. The draft is validated before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] for an incomplete draft, or the
    /// request error.
    #[instrument(skip(self, bearer, draft), fields(name = %draft.name))]
    pub async fn create_item(
        &self,
        bearer: &Bearer,
        draft: &ItemDraft,
    ) -> Result<MenuItem, AdminError> {
        draft.validate()?;
        let url = self.catalog("api/v1/items");
        self.fetch(Method::POST, &url, bearer, Some(draft))
            .await?
            .ok_or_else(|| AdminError::NotFound(url))
    }

    /// Replace an item's fields. The draft is validated before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] for an incomplete draft,
    /// [`AdminError::NotFound`] for an unknown item, or the request error.
    #[instrument(skip(self, bearer, draft), fields(item_id = %id))]
    pub async fn update_item(
        &self,
        bearer: &Bearer,
        id: &ItemId,
        draft: &ItemDraft,
    ) -> Result<MenuItem, AdminError> {
        draft.validate()?;
        let url = self.catalog(&format!("api/v1/items/{}", encode(id.as_str())));
        self.fetch(Method::PUT, &url, bearer, Some(draft))
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("item {id}")))
    }

    /// Delete an item. Returns `false` when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, bearer), fields(item_id = %id))]
    pub async fn delete_item(&self, bearer: &Bearer, id: &ItemId) -> Result<bool, AdminError> {
        let url = self.catalog(&format!("api/v1/items/{}", encode(id.as_str())));
        Ok(self
            .execute(Method::DELETE, &url, bearer, NO_BODY)
            .await?
            .is_some())
    }

    /// Enable or disable an item for customers.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an unknown item, or the request
    /// error.
    #[instrument(skip(self, bearer), fields(item_id = %id))]
    pub async fn set_item_enabled(
        &self,
        bearer: &Bearer,
        id: &ItemId,
        enabled: bool,
    ) -> Result<(), AdminError> {
        let url = self.catalog(&format!("api/v1/items/{}/status", encode(id.as_str())));
        self.execute(Method::PUT, &url, bearer, Some(&StatusUpdate { enabled }))
            .await?
            .map(|_| ())
            .ok_or_else(|| AdminError::NotFound(format!("item {id}")))
    }
}
