//! Dine Storefront - public menu browsing.
//!
//! This crate is the customer-facing side of Dine: it reads a restaurant's
//! menu from the catalog and organization services and turns it into
//! browsable sections and basket display data.
//!
//! # Architecture
//!
//! - [`catalog::CatalogClient`] - `reqwest` client with a `moka` response cache
//! - [`menu::Menu`] - category sections, filters, item lookup and search
//! - [`basket::BasketView`] - formatted view of a [`dine_core::CartKeyStore`]
//!
//! No credentials are needed; everything here uses public endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use dine_core::{CartKeyStore, CategoryFilter, FoodTypeFilter, RestaurantId};
//! use dine_storefront::{CatalogClient, MenuPage, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_env()?;
//! let client = CatalogClient::new(&config)?;
//!
//! let MenuPage::Ready(menu) = client.load_menu(&RestaurantId::new("r-1")).await? else {
//!     return Ok(()); // show "restaurant not found"
//! };
//!
//! for section in menu.sections(&CategoryFilter::All, FoodTypeFilter::All) {
//!     println!("{}: {} items", section.title, section.items.len());
//! }
//!
//! let mut cart = CartKeyStore::new();
//! let first = &menu.items()[0];
//! cart.adjust(&first.id, None, 1, |id| menu.item(id));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod catalog;
pub mod config;
pub mod menu;

pub use basket::{BasketLineView, BasketView};
pub use catalog::{CatalogClient, CatalogError};
pub use config::{ConfigError, StorefrontConfig};
pub use menu::{Menu, MenuPage, MenuSection};
