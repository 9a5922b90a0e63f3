//! Cache types for catalog and organization responses.

use dine_core::{Category, MenuItem, Restaurant, RestaurantId};

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Restaurant(RestaurantId),
    Items(RestaurantId),
    Categories(RestaurantId),
}

/// Cached value types.
///
/// A restaurant lookup caches its `None` too, so repeated visits to an
/// unknown restaurant do not hit the organization service.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Restaurant(Option<Box<Restaurant>>),
    Items(Vec<MenuItem>),
    Categories(Vec<Category>),
}
