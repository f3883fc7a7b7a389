//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                    - Home: catalog + session info
//!
//! # Auth
//! POST /register                            - Create an account
//! POST /login                               - Login action
//! GET  /logout                              - Logout action
//!
//! # Products
//! GET  /products                            - Product listing
//! GET  /products/category/{category}        - Products filtered by category
//! GET  /product/{id}                        - Product detail
//!
//! # Cart (requires auth)
//! GET  /add-to-cart/{product_name}/{price}  - Add one unit to the cart
//! GET  /cart                                - Cart contents
//!
//! # Checkout (requires auth)
//! POST /checkout                            - Redirect to hosted payment page
//! GET  /success?session_id=...              - Payment confirmed; persist order
//! GET  /cancel                              - Payment abandoned; cart intact
//!
//! # Orders (requires auth)
//! GET  /orders                              - Order history
//! GET  /orders/{id}                         - Order detail with line items
//!
//! # Admin (requires admin role, re-checked per request)
//! GET  /admin                               - Dashboard counts
//! GET  /admin/products                      - All products
//! GET  /admin/orders                        - All orders
//! GET  /admin/users                         - All users
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/category/{category}", get(products::by_category))
        .route("/product/{id}", get(products::show))
}

/// Create the cart and checkout routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add-to-cart/{product_name}/{price}", get(cart::add))
        .route("/cart", get(cart::show))
        .route("/checkout", post(checkout::initiate))
        .route("/success", get(checkout::success))
        .route("/cancel", get(checkout::cancel))
}

/// Create the order history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/products", get(admin::products))
        .route("/admin/orders", get(admin::orders))
        .route("/admin/users", get(admin::users))
}

/// Assemble the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .merge(auth_routes())
        .merge(product_routes())
        .merge(cart_routes())
        .merge(order_routes())
        .merge(admin_routes())
}
