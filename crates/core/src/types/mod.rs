//! Core types for Dine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod draft;
pub mod id;
pub mod menu;
pub mod price;
pub mod status;
pub mod username;

pub use draft::{CategoryDraft, FieldError, ItemDraft, RestaurantDraft, ValidationErrors};
pub use id::*;
pub use menu::{
    Category, CategoryRef, ItemVariant, MenuItem, QuantityType, Restaurant, VariantSelector,
};
pub use price::{CurrencyCode, Price};
pub use status::*;
pub use username::{Username, UsernameError};
