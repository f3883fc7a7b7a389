//! Home route handler.

use axum::{Json, extract::State};
use serde::Serialize;

use voltshop_core::Email;

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::middleware::auth::OptionalAuth;
use crate::models::Product;
use crate::state::AppState;

/// Storefront landing payload: the catalog plus whoever is logged in.
#[derive(Debug, Serialize)]
pub struct HomeView {
    /// Logged-in user's email, if any.
    pub user: Option<Email>,
    /// Publishable payment key for the browser-side widget.
    pub publishable_key: String,
    /// Full product catalog.
    pub products: Vec<Product>,
}

/// Home page: the full catalog and the current session's identity.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<HomeView>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(Json(HomeView {
        user: user.map(|u| u.email),
        publishable_key: state.config().stripe.publishable_key.clone(),
        products,
    }))
}
