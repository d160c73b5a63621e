//! Minimal Stripe Checkout client.
//!
//! [`StripeClient`] creates hosted Checkout Sessions over Stripe's
//! form-encoded HTTP API. Only the two session shapes the platform sells are
//! supported (single-path quiz bundle and premium membership); webhook
//! signature verification lives in `waymark_core::signature`.

use std::time::Duration;

use serde::Deserialize;
use waymark_core::types::DbId;

use crate::config::StripeConfig;

/// Stripe REST API base URL.
const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// HTTP request timeout for a single Stripe API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for Stripe API failures.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Stripe returned a non-2xx status code.
    #[error("Stripe returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response was missing an expected field.
    #[error("Stripe response missing field '{0}'")]
    MissingField(&'static str),
}

/// Inputs for creating a hosted Checkout Session.
#[derive(Debug)]
pub struct CheckoutParams<'a> {
    /// Stripe price id to charge.
    pub price_id: &'a str,
    /// Purchase kind recorded in session metadata (`PATH_BUNDLE` or
    /// `PREMIUM_MEMBERSHIP`).
    pub purchase_type: &'a str,
    /// Purchasing user, recorded in session metadata.
    pub user_id: DbId,
    /// Target path for bundle purchases; `None` for premium.
    pub path_id: Option<DbId>,
    /// Where Stripe redirects after a completed payment.
    pub success_url: &'a str,
    /// Where Stripe redirects after an abandoned payment.
    pub cancel_url: &'a str,
}

/// The slice of a Checkout Session response the API needs.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session id (`cs_...`).
    pub id: String,
    /// Hosted payment page URL to redirect the buyer to.
    pub url: String,
}

/// Build the form body for a Checkout Session create call.
///
/// Stripe's API takes bracketed form keys rather than JSON. Metadata values
/// are strings; the webhook parser converts them back.
pub fn checkout_form(params: &CheckoutParams<'_>) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        (
            "payment_method_types[0]".to_string(),
            "card".to_string(),
        ),
        (
            "line_items[0][price]".to_string(),
            params.price_id.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "metadata[purchaseType]".to_string(),
            params.purchase_type.to_string(),
        ),
        ("metadata[userId]".to_string(), params.user_id.to_string()),
    ];
    if let Some(path_id) = params.path_id {
        form.push(("metadata[pathId]".to_string(), path_id.to_string()));
    }
    form.push(("success_url".to_string(), params.success_url.to_string()));
    form.push(("cancel_url".to_string(), params.cancel_url.to_string()));
    form
}

/// Talks to the Stripe API on behalf of checkout handlers.
pub struct StripeClient {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeClient {
    /// Create a new client with a pre-configured HTTP client.
    pub fn new(config: StripeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Price id for a single-path quiz bundle.
    pub fn path_bundle_price(&self) -> &str {
        &self.config.price_path_bundle
    }

    /// Price id for premium membership.
    pub fn premium_price(&self) -> &str {
        &self.config.price_premium
    }

    /// Create a hosted Checkout Session and return its id and payment URL.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutParams<'_>,
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .client
            .post(format!("{STRIPE_API_BASE}/checkout/sessions"))
            .bearer_auth(&self.config.secret_key)
            .form(&checkout_form(params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = response.json().await?;
        let id = value
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or(StripeError::MissingField("id"))?
            .to_string();
        let url = value
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or(StripeError::MissingField("url"))?
            .to_string();
        Ok(CheckoutSession { id, url })
    }
}
