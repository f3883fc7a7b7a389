//! Admin panel route handlers.
//!
//! Every handler takes `RequireAdmin`, which re-checks the role against the
//! database on each request.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::Result;
use crate::middleware::auth::RequireAdmin;
use crate::models::{Order, Product, User};
use crate::state::AppState;

/// Dashboard counts.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
}

/// Admin dashboard: row counts across the store.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Dashboard>> {
    let pool = state.pool();

    Ok(Json(Dashboard {
        users: UserRepository::new(pool).count().await?,
        products: ProductRepository::new(pool).count().await?,
        orders: OrderRepository::new(pool).count().await?,
    }))
}

/// All products, including out-of-stock ones.
pub async fn products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// All orders across all users, newest first.
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// All registered users. Password digests never leave the database layer.
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}
