//! Cart reconciliation against a menu built from catalog payloads.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use dine_core::{
    CartKeyStore, Category, CurrencyCode, ItemId, MenuItem, Restaurant, VariantSelector,
};
use dine_integration_tests::{categories_json, items_json, restaurant_json};
use dine_storefront::{BasketView, Menu};

fn menu() -> Menu {
    let restaurant: Restaurant = serde_json::from_value(restaurant_json()).unwrap();
    let categories: Vec<Category> = serde_json::from_value(categories_json()).unwrap();
    let items: Vec<MenuItem> = serde_json::from_value(items_json()).unwrap();
    Menu::new(restaurant, categories, items)
}

fn half() -> VariantSelector {
    VariantSelector::new("HALF", "1")
}

fn full() -> VariantSelector {
    VariantSelector::new("FULL", "1")
}

#[test]
fn increment_then_decrement_restores_lines() {
    let menu = menu();
    let paneer = ItemId::new("i-paneer");
    let chicken = ItemId::new("i-chicken");

    let mut cart = CartKeyStore::new();
    cart.adjust(&paneer, Some(&half()), 2, |id| menu.item(id));
    let before = cart.clone();

    cart.adjust(&chicken, None, 1, |id| menu.item(id));
    cart.adjust(&chicken, None, -1, |id| menu.item(id));
    assert_eq!(cart, before);

    cart.adjust(&paneer, Some(&half()), 1, |id| menu.item(id));
    cart.adjust(&paneer, Some(&half()), -1, |id| menu.item(id));
    assert_eq!(cart, before);
}

#[test]
fn unit_variants_share_one_line() {
    let menu = menu();
    let naan = ItemId::new("i-naan");

    let mut cart = CartKeyStore::new();
    cart.adjust(&naan, Some(&VariantSelector::new("UNIT", "1")), 1, |id| menu.item(id));
    cart.adjust(&naan, Some(&VariantSelector::new("UNIT", "2")), 1, |id| menu.item(id));

    assert_eq!(cart.len(), 1);
    let line = &cart.lines()[0];
    assert_eq!(line.key.as_str(), "i-naan-UNIT-DEFAULT");
    assert_eq!(line.cart_count, 2);
    assert_eq!(line.item.price.to_string(), "60.00");
}

#[test]
fn decrement_on_empty_cart_creates_nothing() {
    let menu = menu();
    let mut cart = CartKeyStore::new();

    cart.adjust(&ItemId::new("i-paneer"), Some(&half()), -1, |id| menu.item(id));
    cart.adjust(&ItemId::new("i-paneer"), Some(&half()), 0, |id| menu.item(id));

    assert!(cart.is_empty());
}

#[test]
fn unknown_item_is_ignored() {
    let menu = menu();
    let mut cart = CartKeyStore::new();

    cart.adjust(&ItemId::new("i-missing"), None, 3, |id| menu.item(id));

    assert!(cart.is_empty());
}

#[test]
fn repeated_increments_accumulate() {
    let menu = menu();
    let chicken = ItemId::new("i-chicken");

    let mut cart = CartKeyStore::new();
    cart.adjust(&chicken, None, 2, |id| menu.item(id));
    cart.adjust(&chicken, None, 3, |id| menu.item(id));

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.lines()[0].cart_count, 5);
}

#[test]
fn total_for_item_sums_variants() {
    let menu = menu();
    let paneer = ItemId::new("i-paneer");

    let mut cart = CartKeyStore::new();
    cart.adjust(&paneer, Some(&half()), 2, |id| menu.item(id));
    cart.adjust(&paneer, Some(&full()), 3, |id| menu.item(id));
    cart.adjust(&ItemId::new("i-chicken"), None, 1, |id| menu.item(id));

    assert_eq!(cart.total_for_item(&paneer), 5);
    assert_eq!(cart.count_for_variant(&paneer, Some(&half())), 2);
    assert_eq!(cart.count_for_variant(&paneer, Some(&full())), 3);
    assert_eq!(cart.count_for_variant(&paneer, None), 0);
}

#[test]
fn basket_view_uses_captured_prices() {
    let menu = menu();
    let mut cart = CartKeyStore::new();
    cart.adjust(&ItemId::new("i-paneer"), Some(&full()), 2, |id| menu.item(id));
    cart.adjust(&ItemId::new("i-chicken"), None, 1, |id| menu.item(id));

    let view = BasketView::new(&cart, CurrencyCode::INR);

    assert_eq!(view.item_count, 3);
    assert_eq!(view.lines.len(), 2);
    assert_eq!(view.lines[0].title, "Paneer Tikka");
    assert_eq!(view.lines[0].variant_title.as_deref(), Some("1 FULL"));
    assert_eq!(view.lines[0].price, "₹300.00");
    assert_eq!(view.lines[0].line_price, "₹600.00");
    assert_eq!(view.lines[1].variant_title, None);
    assert_eq!(view.subtotal, "₹1020.00");

    cart.remove_at(0);
    let view = BasketView::new(&cart, CurrencyCode::INR);
    assert_eq!(view.subtotal, "₹420.00");
    assert_eq!(view.lines[0].index, 0);
}
