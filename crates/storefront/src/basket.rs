//! Display data for the customer's basket.

use dine_core::{CartKeyStore, CartLine, CurrencyCode, Price};

/// Basket line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketLineView {
    /// Position in the basket, used by the delete action.
    pub index: usize,
    pub title: String,
    /// `None` for items ordered without a variant or as a single unit.
    pub variant_title: Option<String>,
    pub quantity: u64,
    pub price: String,
    pub line_price: String,
}

/// Basket display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketView {
    pub lines: Vec<BasketLineView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl BasketView {
    /// Build the view for a cart, formatting prices in `currency`.
    #[must_use]
    pub fn new(cart: &CartKeyStore, currency: CurrencyCode) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .enumerate()
                .map(|(index, line)| BasketLineView::new(index, line, currency))
                .collect(),
            subtotal: Price::new(cart.subtotal(), currency).to_string(),
            item_count: cart.total_count(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl BasketLineView {
    fn new(index: usize, line: &CartLine, currency: CurrencyCode) -> Self {
        Self {
            index,
            title: line.item.name.clone(),
            variant_title: line
                .variant
                .as_ref()
                .filter(|v| !v.quantity_type.is_unit())
                .map(|v| format!("{} {}", v.quantity_value, v.quantity_type)),
            quantity: line.cart_count,
            price: Price::new(line.item.price, currency).to_string(),
            line_price: Price::new(line.line_total(), currency).to_string(),
        }
    }
}
