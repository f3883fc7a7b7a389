//! Order repository: the append-only order store.
//!
//! There are no UPDATE or DELETE statements here by design; orders are an
//! audit trail, immutable after creation. Inserts are associated functions
//! over any executor so the checkout orchestrator can run them inside its
//! transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use voltshop_core::{Email, OrderId, Price, ProductId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_email, total, payment_session_id, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Look up the order a user's payment session created, if any.
    ///
    /// This is the idempotency check: a replayed confirmation for the same
    /// payment session finds the existing order instead of creating another.
    /// The lookup is scoped to the owning user, so presenting someone else's
    /// payment session id finds nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_payment_session(
        executor: impl PgExecutor<'_>,
        payment_session_id: &str,
        user_email: &Email,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE payment_session_id = $1 AND user_email = $2"
        ))
        .bind(payment_session_id)
        .bind(user_email)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, email: &Email) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_email = $1 ORDER BY id DESC"
        ))
        .bind(email)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// List all orders, newest first. Used by the admin panel.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// The line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, order_id, product_id, product_name, unit_price, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Insert a new order row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an order already exists for
    /// this payment session (a concurrent confirmation won the race).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        user_email: &Email,
        total: Price,
        payment_session_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (user_email, total, payment_session_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_email)
        .bind(total)
        .bind(payment_session_id)
        .bind(created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "order already exists for payment session".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        Ok(order)
    }

    /// Insert an order line item snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_item(
        executor: impl PgExecutor<'_>,
        order_id: OrderId,
        product_id: Option<ProductId>,
        product_name: &str,
        unit_price: Price,
        quantity: i32,
    ) -> Result<OrderItem, RepositoryError> {
        let item = sqlx::query_as::<_, OrderItem>(
            r"
            INSERT INTO order_items (order_id, product_id, product_name, unit_price, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, order_id, product_id, product_name, unit_price, quantity
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(product_name)
        .bind(unit_price)
        .bind(quantity)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    /// Total number of orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
