//! Menu category management.
//!
//! # Endpoints
//!
//! - `GET {catalog}/api/v1/categories/restaurant/{restaurant_id}`
//! - `POST {catalog}/api/v1/categories`
//! - `PUT {catalog}/api/v1/categories/{id}`

use dine_core::{Category, CategoryDraft, CategoryId, RestaurantId};
use dine_core::http::encode;
use reqwest::Method;
use tracing::instrument;

use super::{AdminClient, NO_BODY};
use crate::auth::Bearer;
use crate::error::AdminError;

impl AdminClient {
    /// A restaurant's categories in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, bearer), fields(restaurant_id = %restaurant_id))]
    pub async fn categories(
        &self,
        bearer: &Bearer,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<Category>, AdminError> {
        let url = self.catalog(&format!(
            "api/v1/categories/restaurant/{}",
            encode(restaurant_id.as_str())
        ));
        Ok(self
            .fetch(Method::GET, &url, bearer, NO_BODY)
            .await?
            .unwrap_or_default())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] for an empty name, or the request
    /// error.
    #[instrument(skip(self, bearer, draft), fields(name = %draft.name))]
    pub async fn create_category(
        &self,
        bearer: &Bearer,
        draft: &CategoryDraft,
    ) -> Result<Category, AdminError> {
        draft.validate()?;
        let url = self.catalog("api/v1/categories");
        self.fetch(Method::POST, &url, bearer, Some(draft))
            .await?
            .ok_or_else(|| AdminError::NotFound(url))
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] for an empty name,
    /// [`AdminError::NotFound`] for an unknown category, or the request error.
    #[instrument(skip(self, bearer, draft), fields(category_id = %id, name = %draft.name))]
    pub async fn rename_category(
        &self,
        bearer: &Bearer,
        id: &CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, AdminError> {
        draft.validate()?;
        let url = self.catalog(&format!("api/v1/categories/{}", encode(id.as_str())));
        self.fetch(Method::PUT, &url, bearer, Some(draft))
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("category {id}")))
    }
}
