//! Stripe Checkout client.
//!
//! The storefront never touches card data: checkout creates a hosted
//! Checkout session via Stripe's REST API and redirects the browser to the
//! returned URL. Stripe later redirects back to the success or cancel URL.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Default Stripe API base URL. Overridable for tests.
const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Currency for all checkout sessions.
const CURRENCY: &str = "usd";

/// Errors from payment provider operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Transport-level failure talking to the provider.
    #[error("payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("payment provider error ({status}): {message}")]
    Api {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },
}

/// One line of a checkout session, in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Product display name shown on the hosted payment page.
    pub name: String,
    /// Unit price in minor units (cents).
    pub unit_amount: i64,
    /// Quantity purchased.
    pub quantity: u32,
}

/// A created hosted checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Provider session identifier; doubles as the order idempotency token.
    pub id: String,
    /// Hosted payment page URL to redirect the browser to.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for Stripe's Checkout Sessions API.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: SecretString,
    api_base: String,
}

impl StripeClient {
    /// Create a client against the production Stripe API.
    #[must_use]
    pub fn new(secret_key: SecretString) -> Self {
        Self::with_api_base(secret_key, STRIPE_API_BASE.to_owned())
    }

    /// Create a client against a custom API base (for tests).
    #[must_use]
    pub fn with_api_base(secret_key: SecretString, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            api_base,
        }
    }

    /// Create a hosted checkout session.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Http` on transport failure and
    /// `PaymentError::Api` when Stripe rejects the request.
    pub async fn create_checkout_session(
        &self,
        line_items: &[LineItem],
        success_url: &str,
        cancel_url: &str,
        customer_email: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = session_params(line_items, success_url, cancel_url, customer_email);

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.json::<ApiErrorBody>().await.map_or_else(
                |_| "unparseable provider error".to_owned(),
                |body| body.error.message,
            );
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<CheckoutSession>().await?)
    }
}

/// Build the form-encoded parameters for a checkout session request.
fn session_params(
    line_items: &[LineItem],
    success_url: &str,
    cancel_url: &str,
    customer_email: &str,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_owned(), "payment".to_owned()),
        ("payment_method_types[0]".to_owned(), "card".to_owned()),
        ("success_url".to_owned(), success_url.to_owned()),
        ("cancel_url".to_owned(), cancel_url.to_owned()),
        ("customer_email".to_owned(), customer_email.to_owned()),
    ];

    for (i, item) in line_items.iter().enumerate() {
        params.push((
            format!("line_items[{i}][price_data][currency]"),
            CURRENCY.to_owned(),
        ));
        params.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        params.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        params.push((
            format!("line_items[{i}][quantity]"),
            item.quantity.to_string(),
        ));
    }

    params
}
