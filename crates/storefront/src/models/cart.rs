//! Session-scoped shopping cart.
//!
//! The cart is an ephemeral value object serialized into the user's session.
//! It is never persisted on its own; the only durable trace of a cart is the
//! order created from it at checkout confirmation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use voltshop_core::Price;

/// One pending purchase line.
///
/// Items are keyed by product name: adding a product that is already in the
/// cart bumps its quantity instead of appending a duplicate line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name, the merge key.
    pub product_name: String,
    /// Price locked in when the item was first added.
    pub unit_price: Price,
    /// Number of units, always >= 1.
    pub quantity: u32,
}

/// A per-session shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// If an item with the same name exists its quantity is incremented and
    /// its add-time price kept; otherwise a new line with quantity 1 is
    /// appended.
    pub fn add(&mut self, product_name: &str, unit_price: Price) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_name == product_name)
        {
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                product_name: product_name.to_owned(),
                unit_price,
                quantity: 1,
            });
        }
    }

    /// Sum of unit price x quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.unit_price.line_total(item.quantity))
            .sum()
    }

    /// Empty the cart. Called after a successful order creation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The cart's line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
