//! Integration tests for Dine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dine-integration-tests
//! ```
//!
//! No external services are needed: each test starts `axum` fakes of the
//! catalog, organization and auth services on `127.0.0.1:0` and points the
//! real clients at them.
//!
//! # Test Categories
//!
//! - `cart_properties` - cart reconciliation against a fetched menu
//! - `storefront_catalog` - catalog client, caching and not-found handling
//! - `admin_session` - login, refresh and restore over HTTP with a file store
//! - `admin_catalog` - bearer-authenticated management and optimistic toggles

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use axum::Router;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Fixed "now" for tests driven by a manual clock (2023-11-14T22:13:20Z).
pub const NOW_MS: i64 = 1_700_000_000_000;

/// An `axum` router served on an ephemeral local port until dropped.
pub struct FakeService {
    pub url: Url,
    handle: JoinHandle<()>,
}

impl FakeService {
    /// Serve `router` on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake service");
        let addr = listener.local_addr().expect("Failed to read local address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            url: Url::parse(&format!("http://{addr}")).expect("Failed to build service URL"),
            handle,
        }
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An unsigned JWT with the given expiry (Unix seconds) and roles.
#[must_use]
pub fn jwt(exp_secs: i64, roles: &[&str]) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = json!({
        "exp": exp_secs,
        "sub": "staff-1",
        "preferred_username": "owner",
        "roles": roles,
    });
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.c2ln")
}

/// A session file path unique to this process and `name`.
#[must_use]
pub fn temp_session_file(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("dine-it-{}-{name}", std::process::id()))
        .join("session.json")
}

/// Restaurant `r-1` as served by the organization service.
#[must_use]
pub fn restaurant_json() -> Value {
    json!({
        "id": "r-1",
        "name": "Spice Route",
        "description": "North Indian kitchen",
        "address": "12 Market Road",
        "phone": "+91 80 5555 0101"
    })
}

/// Categories of `r-1`, in display order.
#[must_use]
pub fn categories_json() -> Value {
    json!([
        {"id": "c-starters", "name": "Starters"},
        {"id": "c-mains", "name": "Mains"},
        {"id": "c-drinks", "name": "Drinks"}
    ])
}

/// Items of `r-1`.
///
/// `i-paneer` has HALF/FULL plates, `i-naan` two UNIT variants, `i-lassi`
/// is disabled, and `i-special` sits in a category that is not listed.
#[must_use]
pub fn items_json() -> Value {
    json!([
        {
            "id": "i-paneer",
            "name": "Paneer Tikka",
            "description": "Char-grilled cottage cheese",
            "imageUrls": ["https://img.example.com/paneer.jpg"],
            "category": {"id": "c-starters", "name": "Starters"},
            "type": "VEG",
            "variants": [
                {"quantityType": "HALF", "quantityValue": "1", "listPrice": "180.00"},
                {"quantityType": "FULL", "quantityValue": "1", "listPrice": "320.00", "salePrice": "300.00"}
            ]
        },
        {
            "id": "i-chicken",
            "name": "Butter Chicken",
            "category": {"id": "c-mains", "name": "Mains"},
            "type": "NON_VEG",
            "variants": [
                {"quantityType": "UNIT", "quantityValue": "1", "listPrice": "420.00"}
            ]
        },
        {
            "id": "i-naan",
            "name": "Garlic Naan",
            "category": {"name": "Mains"},
            "type": "VEG",
            "variants": [
                {"quantityType": "UNIT", "quantityValue": "1", "listPrice": "60.00"},
                {"quantityType": "UNIT", "quantityValue": "2", "listPrice": "110.00"}
            ]
        },
        {
            "id": "i-lassi",
            "name": "Mango Lassi",
            "category": {"id": "c-drinks", "name": "Drinks"},
            "type": "VEG",
            "enabled": false,
            "variants": [
                {"quantityType": "ML", "quantityValue": "300", "listPrice": "120.00"}
            ]
        },
        {
            "id": "i-special",
            "name": "Chef's Special",
            "category": {"id": "c-seasonal", "name": "Seasonal"},
            "type": "NON_VEG",
            "variants": []
        }
    ])
}
