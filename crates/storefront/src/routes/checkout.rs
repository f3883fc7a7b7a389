//! Checkout route handlers.
//!
//! The browser never sees card data: `POST /checkout` redirects to the
//! provider's hosted page, and the provider redirects back to `/success`
//! (with the payment session id) or `/cancel`.

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use voltshop_core::{OrderId, Price};

use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::routes::cart::{clear_cart, get_cart};
use crate::state::AppState;

/// Query parameters on the success redirect.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    /// Payment session id substituted by the provider.
    pub session_id: String,
}

/// Order confirmation payload.
#[derive(Debug, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub total: Price,
}

/// Start checkout: create a hosted payment session and redirect to it.
///
/// The cart stays in the session untouched until the provider confirms.
#[instrument(skip(state, session))]
pub async fn initiate(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Redirect> {
    let cart = get_cart(&session).await;

    let payment_session = state.checkout().initiate(&cart, &user.email).await?;

    Ok(Redirect::to(&payment_session.url))
}

/// Payment confirmed: persist the order and clear the cart.
///
/// Safe to replay; a second visit with the same `session_id` returns the
/// already-created order. Only a confirmation that actually created its
/// order from the session cart clears it; a replay (say, an old success URL
/// revisited from browser history) leaves whatever the cart holds now alone.
#[instrument(skip(state, session, query), fields(payment_session_id = %query.session_id))]
pub async fn success(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Query(query): Query<SuccessQuery>,
) -> Result<Json<OrderConfirmation>> {
    let cart = get_cart(&session).await;

    let confirmation = state
        .checkout()
        .confirm(&query.session_id, &cart, &user.email)
        .await?;

    // Only after the order is durably persisted, and only for the cart this
    // confirmation consumed
    if confirmation.is_created() {
        clear_cart(&session).await?;
    }

    let order = confirmation.into_order();

    Ok(Json(OrderConfirmation {
        order_id: order.id,
        total: order.total,
    }))
}

/// Payment abandoned: no state changes, the cart stays as it was.
pub async fn cancel(RequireAuth(_user): RequireAuth) -> Redirect {
    Redirect::to("/cart")
}
