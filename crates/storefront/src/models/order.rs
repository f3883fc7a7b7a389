//! Order domain types.
//!
//! Orders are an append-only audit trail: once created they are never
//! updated or deleted. Order items snapshot product name and unit price at
//! purchase time, so later catalog edits never rewrite history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use voltshop_core::{Email, OrderId, OrderItemId, Price, ProductId};

/// A completed purchase.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Email of the purchasing user.
    pub user_email: Email,
    /// Total re-derived from the cart's line items at confirmation time.
    pub total: Price,
    /// Payment-provider checkout session that paid for this order.
    /// Unique: replaying the same confirmation never creates a second order.
    pub payment_session_id: String,
    /// UTC timestamp of order creation.
    pub created_at: DateTime<Utc>,
}

/// A line within an [`Order`].
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product resolved by name at confirmation time; `None` when the
    /// product had been deleted or renamed since the cart entry was added.
    pub product_id: Option<ProductId>,
    /// Product name snapshot.
    pub product_name: String,
    /// Unit price snapshot.
    pub unit_price: Price,
    /// Purchased quantity.
    pub quantity: i32,
}
