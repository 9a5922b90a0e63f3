//! Dine Core - Shared menu and cart types.
//!
//! This crate provides the types shared by every Dine component:
//! - `storefront` - Public menu browsing client
//! - `admin` - Staff session and menu management client
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transforms - no I/O, no
//! HTTP clients, no clocks. [`http`] holds the URL helpers the clients share. This keeps it lightweight and allows it to be
//! used anywhere, including the cart logic that must behave identically in
//! every front end.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, menu model, statuses and editable drafts
//! - [`cart`] - Cart line reconciliation keyed by item and variant
//! - [`filter`] - Enumerated category, status and food-type filters
//! - [`page`] - Client-side pagination
//! - [`http`] - Endpoint joining, path encoding and body previews

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod filter;
pub mod http;
pub mod page;
pub mod types;

pub use cart::{CartKey, CartKeyStore, CartLine, ItemSnapshot};
pub use filter::{CategoryFilter, FoodTypeFilter, StatusFilter};
pub use page::{Page, paginate};
pub use types::*;
