//! Checkout orchestrator.
//!
//! Drives a cart through the payment pipeline:
//!
//! ```text
//! initiate  -> hosted payment session created, cart untouched
//! confirm   -> order + items persisted, stock decremented, all in one
//!              transaction keyed on the payment session id
//! cancel    -> nothing; the cart stays intact so checkout can resume
//! ```
//!
//! Confirmation is idempotent: the payment session id carries a UNIQUE
//! constraint on the orders table, so a redirect replay (or two racing
//! confirmations) yields exactly one order. Stock decrements are conditional
//! updates that floor at zero; running out of stock mid-confirmation aborts
//! the whole transaction rather than overselling.

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;

use voltshop_core::{Email, Price, PriceError};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::models::{Cart, Order};
use crate::payments::{CheckoutSession, LineItem, PaymentError, StripeClient};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout attempted with no items in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Not enough stock to fulfill a line item.
    #[error("insufficient stock for {product_name}")]
    InsufficientStock {
        /// The product that ran out.
        product_name: String,
    },

    /// A cart amount failed price validation.
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),

    /// Payment provider failure.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Repository/database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Outcome of a checkout confirmation.
///
/// The caller must only consume (clear) the session cart for a
/// [`Confirmation::Created`]: a replay did not build its order from the cart
/// currently in the session, which may already hold the user's next purchase.
#[derive(Debug)]
pub enum Confirmation {
    /// This confirmation persisted a new order from the cart.
    Created(Order),
    /// The payment session had already been confirmed; the existing order is
    /// returned unchanged and the cart was not touched.
    Replayed(Order),
}

impl Confirmation {
    /// The confirmed order, however it was reached.
    #[must_use]
    pub fn into_order(self) -> Order {
        match self {
            Self::Created(order) | Self::Replayed(order) => order,
        }
    }

    /// Whether this confirmation created the order.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// The checkout orchestrator.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    payments: &'a StripeClient,
    base_url: &'a str,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, payments: &'a StripeClient, base_url: &'a str) -> Self {
        Self {
            pool,
            payments,
            base_url,
        }
    }

    /// Start checkout: create a hosted payment session for the cart.
    ///
    /// No local state changes here. The cart stays in the session until the
    /// provider confirms payment, so an abandoned payment page costs
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for a cart with no items, or a
    /// payment error if the provider rejects the session request.
    pub async fn initiate(
        &self,
        cart: &Cart,
        customer_email: &Email,
    ) -> Result<CheckoutSession, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let items = line_items(cart)?;

        // {CHECKOUT_SESSION_ID} is substituted by the provider on redirect
        let success_url = format!(
            "{}/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.base_url
        );
        let cancel_url = format!("{}/cancel", self.base_url);

        let session = self
            .payments
            .create_checkout_session(&items, &success_url, &cancel_url, customer_email.as_str())
            .await?;

        tracing::info!(
            payment_session_id = %session.id,
            lines = items.len(),
            "Created payment session"
        );

        Ok(session)
    }

    /// Confirm a paid checkout: persist the order atomically, at most once.
    ///
    /// The total is re-derived from the cart, never taken from the client.
    /// Each cart line resolves its product by name (the cart carries names,
    /// not ids); unresolved products still get a snapshot row with a null
    /// product id. Resolved products have their stock decremented with a
    /// floor at zero; insufficient stock aborts the whole confirmation.
    ///
    /// The idempotency lookup is scoped to `user_email`, so a payment
    /// session id belonging to another user never resolves to that user's
    /// order. The caller clears the session cart only for a
    /// [`Confirmation::Created`] outcome; a replay leaves whatever cart the
    /// session holds now alone.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when there is neither an existing
    /// order for this user and payment session nor anything in the cart,
    /// `CheckoutError::InsufficientStock` when a line cannot be fulfilled,
    /// and a `RepositoryError::NotFound` when the payment session is already
    /// bound to a different user's order.
    #[tracing::instrument(skip(self, cart), fields(payment_session_id))]
    pub async fn confirm(
        &self,
        payment_session_id: &str,
        cart: &Cart,
        user_email: &Email,
    ) -> Result<Confirmation, CheckoutError> {
        // Idempotency: a replayed confirmation returns the existing order.
        if let Some(existing) =
            OrderRepository::find_by_payment_session(self.pool, payment_session_id, user_email)
                .await?
        {
            tracing::info!(order_id = %existing.id, "Replayed confirmation, returning existing order");
            return Ok(Confirmation::Replayed(existing));
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total = Price::new(cart.total())?;

        let mut tx = self.pool.begin().await?;

        let order = match OrderRepository::insert(
            &mut *tx,
            user_email,
            total,
            payment_session_id,
            Utc::now(),
        )
        .await
        {
            Ok(order) => order,
            Err(RepositoryError::Conflict(_)) => {
                // The insert lost a race. Either a concurrent confirmation by
                // the same user won (yield to it), or the payment session
                // belongs to someone else entirely (the scoped re-fetch finds
                // nothing and the confirmation fails).
                tx.rollback().await?;
                let existing = OrderRepository::find_by_payment_session(
                    self.pool,
                    payment_session_id,
                    user_email,
                )
                .await?;
                return existing.map(Confirmation::Replayed).ok_or(
                    CheckoutError::Repository(RepositoryError::NotFound),
                );
            }
            Err(other) => return Err(other.into()),
        };

        for item in cart.items() {
            let product = ProductRepository::find_by_name(&mut *tx, &item.product_name).await?;
            let quantity = i32::try_from(item.quantity).unwrap_or(i32::MAX);

            OrderRepository::insert_item(
                &mut *tx,
                order.id,
                product.as_ref().map(|p| p.id),
                &item.product_name,
                item.unit_price,
                quantity,
            )
            .await?;

            if let Some(product) = product {
                let decremented =
                    ProductRepository::decrement_stock(&mut *tx, product.id, quantity).await?;
                if !decremented {
                    tx.rollback().await?;
                    return Err(CheckoutError::InsufficientStock {
                        product_name: item.product_name.clone(),
                    });
                }
            }
        }

        tx.commit().await?;

        tracing::info!(order_id = %order.id, total = %order.total, "Order persisted");

        Ok(Confirmation::Created(order))
    }
}

/// Build payment-provider line items from the cart, converting prices to
/// minor currency units.
///
/// # Errors
///
/// Returns `PriceError` if an amount does not fit in minor units.
pub fn line_items(cart: &Cart) -> Result<Vec<LineItem>, PriceError> {
    cart.items()
        .iter()
        .map(|item| {
            Ok(LineItem {
                name: item.product_name.clone(),
                unit_amount: item.unit_price.minor_units()?,
                quantity: item.quantity,
            })
        })
        .collect()
}
