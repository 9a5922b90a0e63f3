//! Bearer-authenticated client for the catalog and organization services.
//!
//! Every call takes a [`Bearer`] obtained from
//! [`SessionManager::bearer`](crate::auth::SessionManager::bearer). The client
//! itself holds no session state; an HTTP 401 comes back as
//! [`AdminError::Unauthorized`] and the caller decides to sign out.
//!
//! Operations are grouped by resource:
//! - [`items`] - menu items and their availability
//! - [`categories`] - menu categories
//! - [`organizations`] - restaurants (super-admin only)

mod categories;
mod items;
mod organizations;

use std::sync::Arc;

use dine_core::http::{endpoint, preview};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Bearer;
use crate::config::AdminConfig;
use crate::error::AdminError;


/// Placeholder body type for requests without one.
const NO_BODY: Option<&()> = None;

/// Admin API client.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    catalog_url: Url,
    organization_url: Url,
}

impl AdminClient {
    /// Create a new admin client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AdminConfig) -> Result<Self, AdminError> {
        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client: config.http_client()?,
                catalog_url: config.catalog_url.clone(),
                organization_url: config.organization_url.clone(),
            }),
        })
    }

    fn catalog(&self, path: &str) -> String {
        endpoint(&self.inner.catalog_url, path)
    }

    fn organization(&self, path: &str) -> String {
        endpoint(&self.inner.organization_url, path)
    }

    /// Send an authenticated request and return the body text.
    ///
    /// `404` yields `Ok(None)`; 401, 403 and 429 map to their own variants.
    async fn execute<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: &str,
        bearer: &Bearer,
        body: Option<&B>,
    ) -> Result<Option<String>, AdminError> {
        let mut request = self
            .inner
            .client
            .request(method.clone(), url)
            .header(AUTHORIZATION, bearer.header_value());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(url = %url, "Admin API rejected the access token");
                return Err(AdminError::Unauthorized);
            }
            StatusCode::FORBIDDEN => {
                return Err(AdminError::Forbidden(format!("{method} {url}")));
            }
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(1);
                return Err(AdminError::RateLimited(retry_after));
            }
            _ => {}
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            let body = preview(&response_text);
            tracing::error!(
                status = %status,
                body = %body,
                method = %method,
                url = %url,
                "Admin API returned non-success status"
            );
            return Err(AdminError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(response_text))
    }

    /// Execute and parse a JSON response. `404` yields `Ok(None)`.
    async fn fetch<T, B>(
        &self,
        method: Method,
        url: &str,
        bearer: &Bearer,
        body: Option<&B>,
    ) -> Result<Option<T>, AdminError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        match self.execute(method, url, bearer, body).await? {
            Some(text) => parse(&text).map(Some),
            None => Ok(None),
        }
    }
}

fn parse<T: DeserializeOwned>(text: &str) -> Result<T, AdminError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %preview(text),
            "Failed to parse admin API response"
        );
        AdminError::Parse(e)
    })
}
