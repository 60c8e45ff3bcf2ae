//! Checkout handlers: shipping-address modal and purchase submission.
//!
//! The flow mirrors the page: checkout opens the shipping modal (guarded
//! by a non-empty cart), submitting the form captures the address and
//! immediately proceeds to the purchase. The captured address is consumed
//! in this one request and discarded; it only reaches the shop service
//! when the `send_shipping` flag is on.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::cart::build_purchase;
use crate::error::Result;
use crate::events;
use crate::middleware::AuthToken;
use crate::models::ShippingInfo;
use crate::routes::cart::{CartView, NotificationTemplate};
use crate::shop::ShopError;
use crate::state::AppState;

/// Shipping modal query data (the selected payment radio rides along via
/// `hx-include`).
#[derive(Debug, Deserialize)]
pub struct ShippingQuery {
    #[serde(rename = "payment-method")]
    pub payment_method: Option<i64>,
}

/// Shipping + purchase form data. Field names match the original page's
/// form controls.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(rename = "payment-method")]
    pub payment_method: Option<i64>,
    #[serde(rename = "full-name")]
    pub full_name: String,
    pub address: String,
    pub city: String,
    #[serde(rename = "postal-code")]
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

/// Shipping-address modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/shipping_modal.html")]
pub struct ShippingModalTemplate {
    pub payment_method: Option<i64>,
}

/// Purchase result fragment: notification plus, on success, an
/// out-of-band swap emptying the cart region and a delayed redirect home.
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_result.html")]
pub struct CheckoutResultTemplate {
    pub success: bool,
    pub message: String,
    pub cart: CartView,
}

/// Open the shipping-address modal (HTMX).
///
/// Guarded by "cart non-empty": an empty cart aborts with a notification
/// and no state change - and, in particular, no purchase request.
#[instrument(skip(state, auth))]
pub async fn shipping_form(
    State(state): State<AppState>,
    auth: AuthToken,
    Query(query): Query<ShippingQuery>,
) -> Response {
    let cart_items = state.shop().load_cart_or_empty(auth.as_deref()).await;

    if cart_items.is_empty() {
        return NotificationTemplate {
            message: "El carrito está vacío".to_string(),
            error: true,
        }
        .into_response();
    }

    ShippingModalTemplate {
        payment_method: query.payment_method,
    }
    .into_response()
}

/// Submit the purchase (HTMX).
///
/// Precondition failures (empty cart, no payment method selected) are
/// caught before any request goes out. Success clears the rendered cart,
/// announces `cart-updated` and schedules the redirect home after the
/// fixed 2-second confirmation delay; failure surfaces the service's
/// rejection message and leaves cart and eligibility untouched.
#[instrument(skip(state, auth, form))]
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthToken,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let shop = state.shop();
    let cart_items = shop.load_cart_or_empty(auth.as_deref()).await;

    // Captured once per attempt, consumed right here, never persisted
    let shipping = ShippingInfo {
        full_name: form.full_name,
        address: form.address,
        city: form.city,
        postal_code: form.postal_code,
        country: form.country,
        phone: form.phone,
    };
    let shipping = state.config().send_shipping.then_some(shipping);

    let purchase = match build_purchase(&cart_items, form.payment_method, shipping, Utc::now()) {
        Ok(purchase) => purchase,
        Err(e) => {
            return Ok(NotificationTemplate {
                message: e.to_string(),
                error: true,
            }
            .into_response());
        }
    };

    match shop.submit_purchase(auth.as_deref(), &purchase).await {
        Ok(()) => {
            state.events().publish_updated();
            Ok((
                AppendHeaders([("HX-Trigger", events::CART_UPDATED)]),
                CheckoutResultTemplate {
                    success: true,
                    message: "¡Compra realizada con éxito!".to_string(),
                    cart: CartView::empty(),
                },
            )
                .into_response())
        }
        Err(ShopError::Rejected(message)) => Ok(CheckoutResultTemplate {
            success: false,
            message: format!("Error: {message}"),
            cart: CartView::empty(),
        }
        .into_response()),
        Err(e) => {
            tracing::error!(error = %e, "purchase submission failed");
            Ok(CheckoutResultTemplate {
                success: false,
                message: "Error: Error al procesar la compra".to_string(),
                cart: CartView::empty(),
            }
            .into_response())
        }
    }
}
