//! Shop & payment gateway (TPP) microservice client.
//!
//! The storefront holds no cart state of its own: the shop service is the
//! source of truth and the frontend re-fetches the whole cart after every
//! successful mutation. All calls forward the visitor's `oversound_auth`
//! session cookie; the service answers 401 for anonymous visitors, which
//! the cart loader deliberately treats as "empty cart" rather than an
//! error.
//!
//! # Endpoints
//!
//! - `GET /cart` - current cart as a JSON array of items
//! - `DELETE /cart/{id}?type={0|1|2}` - remove one item (numeric kind code)
//! - `GET /payment` - registered payment methods
//! - `POST /purchase` - submit a purchase

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use oversound_core::ProductKind;

use crate::middleware::AUTH_COOKIE;
use crate::models::{CartItem, PaymentMethod, PurchaseRequest};

/// Fallback shown when a purchase rejection carries no usable message.
const GENERIC_PURCHASE_ERROR: &str = "Error al procesar la compra";

/// Errors that can occur when talking to the shop service.
#[derive(Debug, Error)]
pub enum ShopError {
    /// HTTP transport failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The visitor is not authenticated (HTTP 401).
    #[error("not authenticated")]
    Unauthorized,

    /// The service answered with an unexpected status.
    #[error("shop service error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The service rejected a purchase; the message comes verbatim from
    /// the response body's `message`/`error` field.
    #[error("{0}")]
    Rejected(String),

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Client for the OverSound shop & payment gateway service.
#[derive(Clone)]
pub struct ShopClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ShopClient {
    /// Create a new shop service client.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ShopError> {
        self.base_url
            .join(path)
            .map_err(|e| ShopError::Parse(format!("invalid endpoint {path}: {e}")))
    }

    fn cookie_header(auth: Option<&str>) -> Option<String> {
        auth.map(|token| format!("{AUTH_COOKIE}={token}"))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Option<&str>,
    ) -> Result<T, ShopError> {
        let mut request = self
            .client
            .get(self.endpoint(path)?)
            .header("Accept", "application/json");
        if let Some(cookie) = Self::cookie_header(auth) {
            request = request.header("Cookie", cookie);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ShopError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShopError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ShopError::Parse(format!(
                "{e} in body: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }

    /// Fetch the visitor's cart.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for anonymous visitors, `Api`/`Http`/`Parse` on any
    /// other failure. Most callers want [`Self::load_cart_or_empty`]
    /// instead, which applies the degrade-to-empty policy.
    #[instrument(skip(self, auth))]
    pub async fn fetch_cart(&self, auth: Option<&str>) -> Result<Vec<CartItem>, ShopError> {
        self.get_json("cart", auth).await
    }

    /// Fetch the cart, degrading every failure to an empty cart.
    ///
    /// Anonymous visitors (401) see an empty cart by design; any other
    /// failure also renders as empty but leaves a diagnostic in the log.
    /// The page never surfaces a raw cart-load error.
    #[instrument(skip(self, auth))]
    pub async fn load_cart_or_empty(&self, auth: Option<&str>) -> Vec<CartItem> {
        match self.fetch_cart(auth).await {
            Ok(cart) => cart,
            Err(ShopError::Unauthorized) => {
                tracing::debug!("visitor not authenticated, treating cart as empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load cart, treating as empty");
                Vec::new()
            }
        }
    }

    /// Remove one item from the cart.
    ///
    /// The `type` query parameter carries the kind's numeric wire code.
    ///
    /// # Errors
    ///
    /// `Unauthorized` on 401, `Api` on any other non-2xx answer.
    #[instrument(skip(self, auth))]
    pub async fn remove_cart_item(
        &self,
        auth: Option<&str>,
        product_id: i64,
        kind: ProductKind,
    ) -> Result<(), ShopError> {
        let mut request = self
            .client
            .delete(self.endpoint(&format!("cart/{product_id}"))?)
            .query(&[("type", kind.code())])
            .header("Accept", "application/json");
        if let Some(cookie) = Self::cookie_header(auth) {
            request = request.header("Cookie", cookie);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ShopError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShopError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// List the visitor's registered payment methods.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for anonymous visitors; the checkout eligibility
    /// probe maps every other failure to the fail-closed panel.
    #[instrument(skip(self, auth))]
    pub async fn list_payment_methods(
        &self,
        auth: Option<&str>,
    ) -> Result<Vec<PaymentMethod>, ShopError> {
        self.get_json("payment", auth).await
    }

    /// Submit a purchase.
    ///
    /// # Errors
    ///
    /// Non-2xx answers become `Rejected` carrying the response body's
    /// `message`/`error` field verbatim, or a generic fallback when the
    /// body has neither.
    #[instrument(skip(self, auth, purchase))]
    pub async fn submit_purchase(
        &self,
        auth: Option<&str>,
        purchase: &PurchaseRequest,
    ) -> Result<(), ShopError> {
        let mut request = self
            .client
            .post(self.endpoint("purchase")?)
            .header("Accept", "application/json")
            .json(purchase);
        if let Some(cookie) = Self::cookie_header(auth) {
            request = request.header("Cookie", cookie);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "purchase rejected");
            return Err(ShopError::Rejected(extract_rejection_message(&body)));
        }

        Ok(())
    }

    /// Check whether the shop service is reachable (readiness probe).
    #[instrument(skip(self))]
    pub async fn ping(&self) -> bool {
        match self.endpoint("cart") {
            Ok(url) => self.client.get(url).send().await.is_ok(),
            Err(_) => false,
        }
    }
}

/// Pull the human-readable rejection message out of an error body.
///
/// The shop service answers rejections with `{"message": ...}` or
/// `{"error": ...}`; anything else falls back to a generic message.
fn extract_rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(serde_json::Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| GENERIC_PURCHASE_ERROR.to_string())
}
