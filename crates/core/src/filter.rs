//! Enumerated menu filters.
//!
//! Filters are resolved once from the fetched category list and then matched
//! against items, rather than comparing free-form names on every render.

use std::str::FromStr;

use crate::types::{Category, CategoryId, FoodType, ItemStatus, MenuItem};

/// Restricts a listing to one category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Resolve a user selection (category id or name) against the known categories.
    ///
    /// `None`, an empty selection, or `"all"` yields [`CategoryFilter::All`].
    /// Returns `None` when the selection names no known category.
    #[must_use]
    pub fn resolve(categories: &[Category], selection: Option<&str>) -> Option<Self> {
        let Some(selection) = selection.map(str::trim).filter(|s| !s.is_empty()) else {
            return Some(Self::All);
        };
        if selection.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }

        categories
            .iter()
            .find(|c| c.id.as_str() == selection)
            .or_else(|| {
                categories
                    .iter()
                    .find(|c| c.name.trim().eq_ignore_ascii_case(selection))
            })
            .cloned()
            .map(Self::Only)
    }

    /// Filter on a known category id.
    #[must_use]
    pub fn by_id(categories: &[Category], id: &CategoryId) -> Option<Self> {
        categories
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .map(Self::Only)
    }

    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => category.contains(&item.category),
        }
    }
}

/// Restricts a listing by availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ItemStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, item: &MenuItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => item.status() == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "enabled" | "active" => Ok(Self::Only(ItemStatus::Enabled)),
            "disabled" | "inactive" => Ok(Self::Only(ItemStatus::Disabled)),
            _ => Err(format!("invalid status filter: {s}")),
        }
    }
}

/// Restricts a listing by dietary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoodTypeFilter {
    #[default]
    All,
    Only(FoodType),
}

impl FoodTypeFilter {
    #[must_use]
    pub fn matches(self, item: &MenuItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(food_type) => item.food_type == food_type,
        }
    }
}

impl FromStr for FoodTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "" | "all" => Ok(Self::All),
            "veg" => Ok(Self::Only(FoodType::Veg)),
            "non_veg" | "nonveg" => Ok(Self::Only(FoodType::NonVeg)),
            _ => Err(format!("invalid food type filter: {s}")),
        }
    }
}
