//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use voltshop_core::ProductId;

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::models::Product;
use crate::state::AppState;

/// Product listing.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Products filtered by category.
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_category(&category)
        .await?;
    Ok(Json(products))
}

/// Product detail. A missing product sends the browser back to the home
/// page rather than a bare 404.
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Response> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::from(id))
        .await?;

    match product {
        Some(product) => Ok(Json(product).into_response()),
        None => Ok(Redirect::to("/").into_response()),
    }
}
