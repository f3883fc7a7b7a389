//! Integration tests for Voltshop.
//!
//! # Running Tests
//!
//! The ignored tests in `tests/` exercise a running storefront end to end:
//!
//! ```bash
//! # Start PostgreSQL, then the storefront
//! cargo run -p voltshop-storefront
//!
//! # Run integration tests against it
//! cargo test -p voltshop-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `STOREFRONT_BASE_URL` - storefront under test (default `http://localhost:3000`)
//! - `VOLTSHOP_DATABASE_URL` - direct database access for seeding/assertions
//! - `VOLTSHOP_ADMIN_EMAIL` / `VOLTSHOP_ADMIN_PASSWORD` - admin panel tests

use reqwest::{Client, Response, redirect};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Password satisfying the storefront's strength policy, for test accounts.
pub const TEST_PASSWORD: &str = "Test-Pass-123!";

/// Base URL for the storefront under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Database URL for direct seeding and assertions.
#[must_use]
pub fn database_url() -> String {
    std::env::var("VOLTSHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("VOLTSHOP_DATABASE_URL must be set for integration tests")
}

/// An HTTP client with a cookie store and redirect following disabled, so
/// tests can assert on Location headers.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email per test run, so tests never collide on the unique index.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@voltshop.test", Uuid::new_v4())
}

/// Register an account through the public form endpoint.
pub async fn register(client: &Client, email: &str, password: &str) -> Response {
    client
        .post(format!("{}/register", base_url()))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("register request failed")
}

/// Log in through the public form endpoint. On success the session cookie
/// lands in the client's cookie store.
pub async fn login(client: &Client, email: &str, password: &str) -> Response {
    client
        .post(format!("{}/login", base_url()))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("login request failed")
}

/// A small pool for direct seeding and assertions against the database.
pub async fn pool() -> PgPool {
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url())
        .await
        .expect("Failed to connect to database")
}

/// Seed a product directly into the catalog, returning its unique name.
///
/// The price is passed as a decimal string (e.g. `"19.99"`) and cast to
/// NUMERIC server-side.
pub async fn seed_product(pool: &PgPool, prefix: &str, price: &str, stock: i32) -> String {
    let name = format!("{prefix} {}", Uuid::new_v4());

    sqlx::query(
        "INSERT INTO products (name, description, price, stock, category)
         VALUES ($1, $2, $3::numeric, $4, $5)",
    )
    .bind(&name)
    .bind("integration test product")
    .bind(price)
    .bind(stock)
    .bind("test")
    .execute(pool)
    .await
    .expect("Failed to seed product");

    name
}

/// Current stock level for a product.
pub async fn product_stock(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar("SELECT stock FROM products WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to read product stock")
}

/// Set a user's role directly, for authorization tests.
pub async fn set_user_role(pool: &PgPool, email: &str, role: &str) {
    sqlx::query("UPDATE users SET role = $2 WHERE email = $1")
        .bind(email)
        .bind(role)
        .execute(pool)
        .await
        .expect("Failed to set user role");
}

/// Number of orders recorded for a payment session id.
pub async fn orders_for_payment_session(pool: &PgPool, payment_session_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE payment_session_id = $1")
        .bind(payment_session_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count orders")
}

/// Register a fresh account and log it in, returning its email.
pub async fn register_and_login(client: &Client, prefix: &str) -> String {
    let email = unique_email(prefix);

    let resp = register(client, &email, TEST_PASSWORD).await;
    assert!(
        resp.status().is_redirection(),
        "registration failed: {}",
        resp.status()
    );

    let resp = login(client, &email, TEST_PASSWORD).await;
    assert!(
        resp.status().is_redirection(),
        "login failed: {}",
        resp.status()
    );

    email
}
