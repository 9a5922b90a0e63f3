//! Restaurant management for super admins.
//!
//! The role is checked from the token claims before any request is made;
//! the backend enforces it again.
//!
//! # Endpoints
//!
//! - `GET|POST {organization}/api/v1/organizations`
//! - `GET|PUT {organization}/api/v1/organizations/id/{id}`

use dine_core::{Restaurant, RestaurantDraft, RestaurantId};
use dine_core::http::encode;
use reqwest::Method;
use tracing::instrument;

use super::{AdminClient, NO_BODY};
use crate::auth::Bearer;
use crate::error::AdminError;

fn require_super_admin(bearer: &Bearer) -> Result<(), AdminError> {
    if bearer.is_super_admin() {
        Ok(())
    } else {
        Err(AdminError::Forbidden(
            "restaurant management requires the super admin role".to_string(),
        ))
    }
}

impl AdminClient {
    /// Every restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] without a request unless the caller
    /// is a super admin, or the request error.
    #[instrument(skip(self, bearer))]
    pub async fn restaurants(&self, bearer: &Bearer) -> Result<Vec<Restaurant>, AdminError> {
        require_super_admin(bearer)?;
        let url = self.organization("api/v1/organizations");
        Ok(self
            .fetch(Method::GET, &url, bearer, NO_BODY)
            .await?
            .unwrap_or_default())
    }

    /// Get a restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] without a request unless the caller
    /// is a super admin, or the request error.
    #[instrument(skip(self, bearer), fields(restaurant_id = %id))]
    pub async fn restaurant(
        &self,
        bearer: &Bearer,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, AdminError> {
        require_super_admin(bearer)?;
        let url = self.organization(&format!("api/v1/organizations/id/{}", encode(id.as_str())));
        self.fetch(Method::GET, &url, bearer, NO_BODY).await
    }

    /// Create a restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] or [`AdminError::Validation`]
    /// without a request, or the request error.
    #[instrument(skip(self, bearer, draft), fields(name = %draft.name))]
    pub async fn create_restaurant(
        &self,
        bearer: &Bearer,
        draft: &RestaurantDraft,
    ) -> Result<Restaurant, AdminError> {
        require_super_admin(bearer)?;
        draft.validate()?;
        let url = self.organization("api/v1/organizations");
        self.fetch(Method::POST, &url, bearer, Some(draft))
            .await?
            .ok_or_else(|| AdminError::NotFound(url))
    }

    /// Update a restaurant's details.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] or [`AdminError::Validation`]
    /// without a request, [`AdminError::NotFound`] for an unknown
    /// restaurant, or the request error.
    #[instrument(skip(self, bearer, draft), fields(restaurant_id = %id))]
    pub async fn update_restaurant(
        &self,
        bearer: &Bearer,
        id: &RestaurantId,
        draft: &RestaurantDraft,
    ) -> Result<Restaurant, AdminError> {
        require_super_admin(bearer)?;
        draft.validate()?;
        let url = self.organization(&format!("api/v1/organizations/id/{}", encode(id.as_str())));
        self.fetch(Method::PUT, &url, bearer, Some(draft))
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("restaurant {id}")))
    }
}

#[cfg(test)]
mod tests {
    use dine_core::StaffRole;
    use secrecy::SecretString;

    use super::*;

    fn bearer(role: Option<StaffRole>) -> Bearer {
        Bearer {
            token: SecretString::from("t"),
            role,
            username: None,
        }
    }

    #[test]
    fn test_super_admin_required() {
        assert!(require_super_admin(&bearer(Some(StaffRole::SuperAdmin))).is_ok());
        assert!(matches!(
            require_super_admin(&bearer(Some(StaffRole::Admin))),
            Err(AdminError::Forbidden(_))
        ));
        assert!(require_super_admin(&bearer(None)).is_err());
    }
}
