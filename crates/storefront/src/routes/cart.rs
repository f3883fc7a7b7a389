//! Cart route handlers.
//!
//! The cart lives in the server-side session. Add-to-cart takes the price
//! from the URL for display parity with the product page, but always
//! revalidates it against the catalog; a stale or tampered price is
//! rejected, never honored.

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::{Cart, CartItem, session_keys};
use crate::state::AppState;

/// Load the cart from the session, defaulting to empty.
pub async fn get_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the cart back into the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("Session error: {e}")))
}

/// Remove the cart from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_cart(session: &Session) -> Result<()> {
    session
        .remove::<Cart>(session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(format!("Session error: {e}")))?;
    Ok(())
}

/// Cart display payload.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub unit_count: u32,
}

/// Add one unit of a product to the cart.
///
/// The URL carries the price the user saw; the catalog price is
/// authoritative. An unknown product is a 404, a mismatched price a 400.
#[instrument(skip(state, session), fields(product = %product_name))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    session: Session,
    Path((product_name, price)): Path<(String, Decimal)>,
) -> Result<Redirect> {
    let product = ProductRepository::new(state.pool())
        .get_by_name(&product_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No product named {product_name}")))?;

    if product.price.amount() != price {
        return Err(AppError::BadRequest(
            "Price does not match the catalog".to_string(),
        ));
    }

    let mut cart = get_cart(&session).await;
    cart.add(&product.name, product.price);
    set_cart(&session, &cart).await?;

    tracing::debug!(units = cart.unit_count(), "Added to cart");

    Ok(Redirect::to("/cart"))
}

/// Show the cart contents with the running total.
pub async fn show(RequireAuth(_user): RequireAuth, session: Session) -> Result<Json<CartView>> {
    let cart = get_cart(&session).await;

    Ok(Json(CartView {
        total: cart.total(),
        unit_count: cart.unit_count(),
        items: cart.items().to_vec(),
    }))
}
