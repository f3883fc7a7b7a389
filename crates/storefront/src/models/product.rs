//! Product catalog domain types.

use serde::Serialize;

use voltshop_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name. Also the key cart entries carry, so order confirmation
    /// resolves products by name rather than id.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Current catalog price.
    pub price: Price,
    /// Units in stock. The schema enforces the zero floor.
    pub stock: i32,
    /// Optional product image reference.
    pub image_url: Option<String>,
    /// Optional category (e.g. "graphics-cards", "processors").
    pub category: Option<String>,
}
