//! Editable forms for menu items, categories and restaurants.
//!
//! Drafts are validated locally before they are sent anywhere; a draft
//! with empty required fields never reaches a backend.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, RestaurantId};
use super::menu::{ItemVariant, MenuItem};
use super::status::FoodType;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name as sent on the wire (camelCase).
    pub field: String,
    /// Human-readable problem.
    pub message: String,
}

/// Every problem found in a draft, in field order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("{}", format_field_errors(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Whether the given field failed validation.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// =============================================================================
// Item
// =============================================================================

/// Create/update payload for a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub restaurant_id: RestaurantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub category_id: Option<CategoryId>,
    #[serde(rename = "type")]
    pub food_type: FoodType,
    pub variants: Vec<ItemVariant>,
}

impl ItemDraft {
    /// Start an edit form from an existing item.
    ///
    /// The category id is only carried over when the item's category
    /// reference has one.
    #[must_use]
    pub fn from_item(restaurant_id: RestaurantId, item: &MenuItem) -> Self {
        Self {
            restaurant_id,
            name: item.name.clone(),
            description: item.description.clone(),
            image_urls: item.image_urls.clone(),
            category_id: item.category.id.clone(),
            food_type: item.food_type,
            variants: item.variants.clone(),
        }
    }

    /// Check required fields and price sanity.
    ///
    /// # Errors
    ///
    /// Returns every failing field: empty name, missing category, no
    /// variants, a variant with an empty quantity value, or a negative price.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if is_blank(&self.name) {
            errors.push("name", "name is required");
        }
        if self.category_id.as_ref().is_none_or(|id| is_blank(id.as_str())) {
            errors.push("categoryId", "category is required");
        }
        if self.variants.is_empty() {
            errors.push("variants", "at least one variant is required");
        }
        for (index, variant) in self.variants.iter().enumerate() {
            if is_blank(variant.quantity_type.as_str()) {
                errors.push(
                    format!("variants[{index}].quantityType"),
                    "quantity type is required",
                );
            }
            if !variant.quantity_type.is_unit() && is_blank(&variant.quantity_value) {
                errors.push(
                    format!("variants[{index}].quantityValue"),
                    "quantity value is required",
                );
            }
            if variant.list_price < Decimal::ZERO {
                errors.push(
                    format!("variants[{index}].listPrice"),
                    "price cannot be negative",
                );
            }
            if variant.sale_price.is_some_and(|p| p < Decimal::ZERO) {
                errors.push(
                    format!("variants[{index}].salePrice"),
                    "price cannot be negative",
                );
            }
        }

        errors.into_result()
    }
}

// =============================================================================
// Category
// =============================================================================

/// Create/rename payload for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub restaurant_id: RestaurantId,
    pub name: String,
}

impl CategoryDraft {
    /// # Errors
    ///
    /// Returns an error when the name is empty.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if is_blank(&self.name) {
            errors.push("name", "name is required");
        }
        errors.into_result()
    }
}

// =============================================================================
// Restaurant
// =============================================================================

/// Create/update payload for a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl RestaurantDraft {
    /// # Errors
    ///
    /// Returns an error when the name is empty.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if is_blank(&self.name) {
            errors.push("name", "name is required");
        }
        errors.into_result()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::menu::QuantityType;

    fn variant(quantity_type: &str, value: &str, price: i64) -> ItemVariant {
        ItemVariant {
            quantity_type: QuantityType::from(quantity_type),
            quantity_value: value.to_string(),
            list_price: Decimal::from(price),
            sale_price: None,
        }
    }

    fn draft() -> ItemDraft {
        ItemDraft {
            restaurant_id: RestaurantId::new("r-1"),
            name: "Masala Dosa".to_string(),
            description: None,
            image_urls: vec![],
            category_id: Some(CategoryId::new("c-1")),
            food_type: FoodType::Veg,
            variants: vec![variant("UNIT", "", 90)],
        }
    }

    #[test]
    fn test_valid_item_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_item_draft_reports_every_missing_field() {
        let mut form = draft();
        form.name = "  ".to_string();
        form.category_id = None;
        form.variants.clear();

        let errors = form.validate().unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("categoryId"));
        assert!(errors.has("variants"));
        assert_eq!(errors.errors.len(), 3);
    }

    #[test]
    fn test_measured_variant_needs_value() {
        let mut form = draft();
        form.variants = vec![variant("PLATE", "", 100), variant("PLATE", "FULL", -1)];

        let errors = form.validate().unwrap_err();
        assert!(errors.has("variants[0].quantityValue"));
        assert!(errors.has("variants[1].listPrice"));
        assert!(!errors.has("variants[1].quantityValue"));
    }

    #[test]
    fn test_error_display_joins_fields() {
        let form = CategoryDraft {
            restaurant_id: RestaurantId::new("r-1"),
            name: String::new(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "name: name is required");
    }

    #[test]
    fn test_restaurant_draft_requires_name() {
        assert!(RestaurantDraft::default().validate().is_err());
        let named = RestaurantDraft {
            name: "Udupi Palace".to_string(),
            ..RestaurantDraft::default()
        };
        assert!(named.validate().is_ok());
    }

    #[test]
    fn test_item_draft_wire_format() {
        let json = serde_json::to_value(draft()).unwrap();
        assert_eq!(json["restaurantId"], "r-1");
        assert_eq!(json["categoryId"], "c-1");
        assert_eq!(json["type"], "VEG");
        assert_eq!(json["variants"][0]["quantityType"], "UNIT");
    }
}
