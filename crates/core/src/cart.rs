//! Session-local cart reconciliation.
//!
//! A cart is an insertion-ordered list of [`CartLine`]s with at most one line
//! per [`CartKey`]. Lines are created on the first positive adjustment,
//! mutated in place afterwards, and removed as soon as their count would
//! reach zero. Nothing here performs I/O and no operation fails.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{FoodType, ItemId, MenuItem, VariantSelector};

/// Deterministic identity of a cart line.
///
/// - no variant: `"{itemId}"`
/// - `UNIT` variant: `"{itemId}-UNIT-DEFAULT"`, whatever its value
/// - any other variant: `"{itemId}-{quantityType}-{quantityValue}"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(String);

impl CartKey {
    #[must_use]
    pub fn compute(item_id: &ItemId, variant: Option<&VariantSelector>) -> Self {
        let key = match variant {
            None => item_id.to_string(),
            Some(v) if v.quantity_type.is_unit() => format!("{item_id}-UNIT-DEFAULT"),
            Some(v) => format!("{item_id}-{}-{}", v.quantity_type, v.quantity_value),
        };
        Self(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Item details copied into the cart when a line is created.
///
/// Later catalog changes do not affect lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub name: String,
    pub description: Option<String>,
    /// Unit price of the selected variant.
    pub price: Decimal,
    pub food_type: FoodType,
    pub image_url: Option<String>,
}

impl ItemSnapshot {
    /// Snapshot `item` for the given variant selection.
    ///
    /// The price is the matching variant's effective price, falling back to
    /// the first variant, then to zero for items without variants.
    #[must_use]
    pub fn capture(item: &MenuItem, variant: Option<&VariantSelector>) -> Self {
        let price = variant
            .and_then(|selector| item.variant(selector))
            .or_else(|| item.variants.first())
            .map_or(Decimal::ZERO, crate::types::ItemVariant::effective_price);

        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            price,
            food_type: item.food_type,
            image_url: item.image_url().map(str::to_owned),
        }
    }
}

/// One aggregated (item, variant) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub key: CartKey,
    pub item_id: ItemId,
    pub variant: Option<VariantSelector>,
    /// Always at least 1.
    pub cart_count: u64,
    pub item: ItemSnapshot,
}

impl CartLine {
    /// Snapshot price multiplied by the count.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.item.price.saturating_mul(Decimal::from(self.cart_count))
    }
}

/// The cart of one browsing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartKeyStore {
    lines: Vec<CartLine>,
}

impl CartKeyStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// See [`CartKey::compute`].
    #[must_use]
    pub fn compute_key(item_id: &ItemId, variant: Option<&VariantSelector>) -> CartKey {
        CartKey::compute(item_id, variant)
    }

    /// Add `delta` (possibly negative) to the line for `(item_id, variant)`.
    ///
    /// - absent line, `delta > 0`: a line is created from `lookup(item_id)`;
    ///   if the lookup finds nothing the cart is unchanged
    /// - absent line, `delta <= 0`: unchanged
    /// - present line: the count becomes `count + delta`, and the line is
    ///   removed when that is `<= 0`; an increment that would overflow the
    ///   count leaves the line unchanged
    ///
    /// `lookup` is only called when a line is about to be created. The new
    /// line's price is captured by [`ItemSnapshot::capture`]: when `variant`
    /// matches none of the item's variants, the first variant's price is
    /// used.
    pub fn adjust<'a, F>(
        &mut self,
        item_id: &ItemId,
        variant: Option<&VariantSelector>,
        delta: i32,
        lookup: F,
    ) -> &[CartLine]
    where
        F: FnOnce(&ItemId) -> Option<&'a MenuItem>,
    {
        let key = CartKey::compute(item_id, variant);

        match self.lines.iter().position(|line| line.key == key) {
            Some(index) => {
                let current = self.lines.get(index).map_or(0, |line| line.cart_count);
                match current.checked_add_signed(i64::from(delta)) {
                    Some(next) if next > 0 => {
                        if let Some(line) = self.lines.get_mut(index) {
                            line.cart_count = next;
                        }
                    }
                    // Past u64::MAX is ignored rather than clamped.
                    None if delta > 0 => {}
                    _ => {
                        self.lines.remove(index);
                    }
                }
            }
            None if delta > 0 => {
                if let Some(item) = lookup(item_id) {
                    self.lines.push(CartLine {
                        key,
                        item_id: item_id.clone(),
                        variant: variant.cloned(),
                        cart_count: u64::from(delta.unsigned_abs()),
                        item: ItemSnapshot::capture(item, variant),
                    });
                }
            }
            None => {}
        }

        &self.lines
    }

    /// Sum of counts over every line of `item_id`, across variants.
    #[must_use]
    pub fn total_for_item(&self, item_id: &ItemId) -> u64 {
        self.lines
            .iter()
            .filter(|line| &line.item_id == item_id)
            .fold(0, |total, line| total.saturating_add(line.cart_count))
    }

    /// Count of the exact `(item_id, variant)` line, 0 when absent.
    #[must_use]
    pub fn count_for_variant(&self, item_id: &ItemId, variant: Option<&VariantSelector>) -> u64 {
        let key = CartKey::compute(item_id, variant);
        self.lines
            .iter()
            .find(|line| line.key == key)
            .map_or(0, |line| line.cart_count)
    }

    /// Remove the line at `index` in insertion order. Out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> &[CartLine] {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
        &self.lines
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.cart_count))
    }

    /// Sum of line totals at snapshot prices.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{CategoryRef, ItemVariant, QuantityType};

    fn biryani() -> MenuItem {
        MenuItem {
            id: ItemId::new("biryani"),
            name: "Chicken Biryani".to_string(),
            description: Some("Dum cooked".to_string()),
            image_urls: vec!["https://img/biryani.jpg".to_string()],
            category: CategoryRef {
                id: None,
                name: "Mains".to_string(),
            },
            food_type: FoodType::NonVeg,
            variants: vec![
                ItemVariant {
                    quantity_type: QuantityType::from("PLATE"),
                    quantity_value: "HALF".to_string(),
                    list_price: Decimal::from(180),
                    sale_price: None,
                },
                ItemVariant {
                    quantity_type: QuantityType::from("PLATE"),
                    quantity_value: "FULL".to_string(),
                    list_price: Decimal::from(320),
                    sale_price: Some(Decimal::from(300)),
                },
            ],
            enabled: true,
        }
    }

    fn half() -> VariantSelector {
        VariantSelector::new("PLATE", "HALF")
    }

    fn full() -> VariantSelector {
        VariantSelector::new("PLATE", "FULL")
    }

    #[test]
    fn test_compute_key_rules() {
        let id = ItemId::new("42");
        assert_eq!(CartKey::compute(&id, None).as_str(), "42");
        assert_eq!(
            CartKey::compute(&id, Some(&VariantSelector::new("UNIT", "Large"))).as_str(),
            "42-UNIT-DEFAULT"
        );
        assert_eq!(CartKey::compute(&id, Some(&half())).as_str(), "42-PLATE-HALF");
    }

    #[test]
    fn test_unit_variants_collapse() {
        let id = ItemId::new("42");
        assert_eq!(
            CartKeyStore::compute_key(&id, Some(&VariantSelector::new("UNIT", "Large"))),
            CartKeyStore::compute_key(&id, Some(&VariantSelector::new("UNIT", "Small")))
        );
    }

    #[test]
    fn test_increments_merge_into_one_line() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        cart.adjust(&item.id, Some(&half()), 2, |_| Some(&item));
        let lines = cart.adjust(&item.id, Some(&half()), 3, |_| Some(&item));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].cart_count, 5);
    }

    #[test]
    fn test_increment_then_decrement_cancels() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        cart.adjust(&item.id, Some(&full()), 1, |_| Some(&item));
        let before = cart.clone();

        cart.adjust(&item.id, Some(&half()), 1, |_| Some(&item));
        cart.adjust(&item.id, Some(&half()), -1, |_| Some(&item));
        assert_eq!(cart, before);

        cart.adjust(&item.id, Some(&full()), 1, |_| Some(&item));
        cart.adjust(&item.id, Some(&full()), -1, |_| Some(&item));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_on_empty_cart_is_noop() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        let mut looked_up = false;
        cart.adjust(&item.id, None, -1, |_| {
            looked_up = true;
            Some(&item)
        });
        assert!(cart.is_empty());
        assert!(!looked_up, "lookup only runs when creating a line");
    }

    #[test]
    fn test_overshooting_decrement_removes_line() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        cart.adjust(&item.id, None, 2, |_| Some(&item));
        cart.adjust(&item.id, None, -5, |_| Some(&item));
        assert!(cart.is_empty());
        assert_eq!(cart.count_for_variant(&item.id, None), 0);
    }

    #[test]
    fn test_missing_catalog_item_is_noop() {
        let mut cart = CartKeyStore::new();
        cart.adjust(&ItemId::new("ghost"), None, 1, |_| None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_across_variants() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        cart.adjust(&item.id, Some(&half()), 2, |_| Some(&item));
        cart.adjust(&item.id, Some(&full()), 1, |_| Some(&item));
        cart.adjust(&item.id, None, 4, |_| Some(&item));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_for_item(&item.id), 7);
        assert_eq!(cart.count_for_variant(&item.id, Some(&half())), 2);
        assert_eq!(cart.count_for_variant(&item.id, Some(&full())), 1);
        assert_eq!(cart.total_for_item(&ItemId::new("other")), 0);
    }

    #[test]
    fn test_snapshot_prices() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        cart.adjust(&item.id, Some(&half()), 2, |_| Some(&item));
        cart.adjust(&item.id, Some(&full()), 1, |_| Some(&item));

        assert_eq!(cart.lines()[0].item.price, Decimal::from(180));
        assert_eq!(cart.lines()[1].item.price, Decimal::from(300));
        assert_eq!(cart.subtotal(), Decimal::from(660));
        assert_eq!(cart.total_count(), 3);
    }

    #[test]
    fn test_remove_at() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        cart.adjust(&item.id, Some(&half()), 1, |_| Some(&item));
        cart.adjust(&item.id, Some(&full()), 1, |_| Some(&item));

        assert_eq!(cart.remove_at(5).len(), 2);
        let lines = cart.remove_at(0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].variant, Some(full()));
    }

    #[test]
    fn test_unit_key_for_directly_built_selector() {
        let id = ItemId::new("42");
        let built = VariantSelector {
            quantity_type: QuantityType::Measured("UNIT".to_string()),
            quantity_value: "Large".to_string(),
        };
        assert_eq!(
            CartKey::compute(&id, Some(&built)),
            CartKey::compute(&id, Some(&VariantSelector::new("UNIT", "Small")))
        );
        assert_eq!(CartKey::compute(&id, Some(&built)).as_str(), "42-UNIT-DEFAULT");
    }

    #[test]
    fn test_large_counts_still_cancel() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        for _ in 0..3 {
            cart.adjust(&item.id, Some(&half()), i32::MAX, |_| Some(&item));
        }
        let expected = 3 * u64::from(i32::MAX.unsigned_abs());
        assert_eq!(cart.total_for_item(&item.id), expected);

        let before = cart.clone();
        cart.adjust(&item.id, Some(&half()), 1, |_| Some(&item));
        cart.adjust(&item.id, Some(&half()), -1, |_| Some(&item));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_counts_at_the_limit_never_overflow() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        cart.adjust(&item.id, Some(&half()), 1, |_| Some(&item));
        cart.adjust(&item.id, Some(&full()), 1, |_| Some(&item));
        for line in &mut cart.lines {
            line.cart_count = u64::MAX;
        }

        assert_eq!(cart.total_for_item(&item.id), u64::MAX);
        assert_eq!(cart.total_count(), u64::MAX);
        assert!(cart.subtotal() > Decimal::ZERO);

        cart.adjust(&item.id, Some(&half()), 1, |_| Some(&item));
        assert_eq!(cart.count_for_variant(&item.id, Some(&half())), u64::MAX);
        cart.adjust(&item.id, Some(&half()), -1, |_| Some(&item));
        assert_eq!(cart.count_for_variant(&item.id, Some(&half())), u64::MAX - 1);
    }

    #[test]
    fn test_decrement_past_zero_removes_line() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        cart.adjust(&item.id, Some(&half()), 2, |_| Some(&item));
        assert!(cart.adjust(&item.id, Some(&half()), -5, |_| Some(&item)).is_empty());
    }

    #[test]
    fn test_unmatched_selector_takes_first_variant_price() {
        let item = biryani();
        let mut cart = CartKeyStore::new();
        let lines = cart.adjust(
            &item.id,
            Some(&VariantSelector::new("PLATE", "FAMILY")),
            1,
            |_| Some(&item),
        );
        assert_eq!(lines[0].item.price, Decimal::from(180));
    }
}
