//! Menu domain types as served by the catalog and organization services.
//!
//! Field names follow the backends' camelCase JSON.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ItemId, RestaurantId};
use super::status::{FoodType, ItemStatus};

// =============================================================================
// Variants
// =============================================================================

/// How a variant's quantity is expressed.
///
/// `UNIT` is the only tag with special meaning: all `UNIT` variants of an
/// item are interchangeable for cart purposes. Every other tag is kept
/// verbatim from the catalog. A `Measured("UNIT")` tag is the same as
/// [`QuantityType::Unit`]: equality, hashing and [`QuantityType::is_unit`]
/// all compare the wire tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuantityType {
    Unit,
    Measured(String),
}

impl QuantityType {
    /// Wire tag for single-unit variants.
    pub const UNIT: &'static str = "UNIT";

    /// The tag as sent by the catalog.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unit => Self::UNIT,
            Self::Measured(tag) => tag,
        }
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.as_str() == Self::UNIT
    }
}

impl PartialEq for QuantityType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for QuantityType {}

impl std::hash::Hash for QuantityType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<String> for QuantityType {
    fn from(tag: String) -> Self {
        if tag == Self::UNIT {
            Self::Unit
        } else {
            Self::Measured(tag)
        }
    }
}

impl From<&str> for QuantityType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<QuantityType> for String {
    fn from(quantity_type: QuantityType) -> Self {
        match quantity_type {
            QuantityType::Unit => QuantityType::UNIT.to_owned(),
            QuantityType::Measured(tag) => tag,
        }
    }
}

impl std::fmt::Display for QuantityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a purchasable configuration of an item (e.g. `HALF` / `FULL`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSelector {
    pub quantity_type: QuantityType,
    pub quantity_value: String,
}

impl VariantSelector {
    #[must_use]
    pub fn new(quantity_type: impl Into<QuantityType>, quantity_value: impl Into<String>) -> Self {
        Self {
            quantity_type: quantity_type.into(),
            quantity_value: quantity_value.into(),
        }
    }

    /// Whether `other` refers to the same cart slot.
    ///
    /// `UNIT` selectors match each other regardless of their value.
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        if self.quantity_type.is_unit() && other.quantity_type.is_unit() {
            return true;
        }
        self == other
    }
}

/// A priced variant of a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemVariant {
    pub quantity_type: QuantityType,
    pub quantity_value: String,
    pub list_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
}

impl ItemVariant {
    /// Price charged to the customer: the sale price when set, else the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.list_price)
    }

    /// Whether the variant is currently discounted.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.list_price)
    }

    #[must_use]
    pub fn selector(&self) -> VariantSelector {
        VariantSelector {
            quantity_type: self.quantity_type.clone(),
            quantity_value: self.quantity_value.clone(),
        }
    }
}

// =============================================================================
// Items & Categories
// =============================================================================

/// Category reference embedded in an item.
///
/// Older catalog payloads only carry the category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
}

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Whether an item's category reference points at this category.
    ///
    /// Ids are compared when the reference carries one; otherwise the
    /// trimmed names must match.
    #[must_use]
    pub fn contains(&self, category: &CategoryRef) -> bool {
        category.id.as_ref().map_or_else(
            || category.name.trim() == self.name.trim(),
            |id| *id == self.id,
        )
    }
}

const fn default_enabled() -> bool {
    true
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub category: CategoryRef,
    #[serde(rename = "type")]
    pub food_type: FoodType,
    #[serde(default)]
    pub variants: Vec<ItemVariant>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl MenuItem {
    #[must_use]
    pub const fn status(&self) -> ItemStatus {
        ItemStatus::from_enabled(self.enabled)
    }

    /// The variant a cart selector refers to, if any.
    #[must_use]
    pub fn variant(&self, selector: &VariantSelector) -> Option<&ItemVariant> {
        self.variants
            .iter()
            .find(|variant| variant.selector().same_slot(selector))
    }

    /// Price shown for the item as a whole: the cheapest effective variant price.
    #[must_use]
    pub fn starting_price(&self) -> Option<Decimal> {
        self.variants.iter().map(ItemVariant::effective_price).min()
    }

    /// Primary image, if the item has any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

// =============================================================================
// Restaurants
// =============================================================================

/// A restaurant (an "organization" in the backend's terms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}
