//! Order history route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use voltshop_core::OrderId;

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::{Order, OrderItem};
use crate::state::AppState;

/// An order with its line items.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// The logged-in user's order history, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_by_user(&user.email)
        .await?;
    Ok(Json(orders))
}

/// One of the user's orders with its line items.
///
/// Another user's order is indistinguishable from a missing one.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetail>> {
    let repo = OrderRepository::new(state.pool());
    let order_id = OrderId::from(id);

    let order = repo
        .get(order_id)
        .await?
        .filter(|order| order.user_email == user.email)
        .ok_or_else(|| AppError::NotFound(format!("No order {id}")))?;

    let items = repo.items(order_id).await?;

    Ok(Json(OrderDetail { order, items }))
}
