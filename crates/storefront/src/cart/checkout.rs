//! Checkout eligibility and purchase building.
//!
//! Eligibility is re-computed on every cart page render by probing the
//! payment-methods endpoint; any failure other than an explicit empty
//! list fails closed to the not-authenticated panel. Purchase building is
//! pure: it partitions the cart by product kind and stamps the total and
//! timestamp, leaving all I/O to the caller.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use oversound_core::ProductKind;

use crate::models::{CartItem, PaymentMethod, PurchaseRequest, ShippingInfo};
use crate::shop::ShopError;

use super::OrderSummary;

/// Whether the visitor can check out, and with what.
#[derive(Debug, Clone)]
pub enum Eligibility {
    /// Authenticated with at least one payment method; the list renders
    /// as selectable cards with the first preselected.
    Eligible(Vec<PaymentMethod>),
    /// Authenticated but no payment method registered.
    NoPaymentMethod,
    /// Not authenticated (or the probe failed - fail closed).
    NotAuthenticated,
}

impl Eligibility {
    /// Map the payment-methods probe result.
    ///
    /// 401 means not authenticated; an empty 200 means no method; any
    /// other failure is treated as not authenticated rather than
    /// guessing.
    #[must_use]
    pub fn from_probe(probe: Result<Vec<PaymentMethod>, ShopError>) -> Self {
        match probe {
            Ok(methods) if methods.is_empty() => Self::NoPaymentMethod,
            Ok(methods) => Self::Eligible(methods),
            Err(ShopError::Unauthorized) => Self::NotAuthenticated,
            Err(e) => {
                tracing::warn!(error = %e, "payment-methods probe failed, failing closed");
                Self::NotAuthenticated
            }
        }
    }

    /// The checkout control is enabled iff the visitor is eligible.
    #[must_use]
    pub const fn can_checkout(&self) -> bool {
        matches!(self, Self::Eligible(_))
    }
}

/// Client-side preconditions caught before any purchase request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("El carrito está vacío")]
    EmptyCart,
    #[error("Por favor selecciona un método de pago")]
    NoPaymentMethodSelected,
}

/// Build the purchase request for the current cart.
///
/// Partitions the cart's ids into the three kind lists (each tagged item
/// lands in exactly one), computes `total = subtotal * 1.21` and stamps
/// an ISO-8601 date. `shipping` is passed through as-is; callers enable
/// it via configuration.
///
/// # Errors
///
/// `EmptyCart` when there is nothing to buy, `NoPaymentMethodSelected`
/// when no method id was submitted - both abort before any network call.
pub fn build_purchase(
    cart: &[CartItem],
    payment_method_id: Option<i64>,
    shipping: Option<ShippingInfo>,
    now: DateTime<Utc>,
) -> Result<PurchaseRequest, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let payment_method_id = payment_method_id.ok_or(CheckoutError::NoPaymentMethodSelected)?;

    let mut song_ids = Vec::new();
    let mut album_ids = Vec::new();
    let mut merch_ids = Vec::new();
    for item in cart {
        match (item.kind(), item.product_id()) {
            (Some(ProductKind::Song), Some(id)) => song_ids.push(id),
            (Some(ProductKind::Album), Some(id)) => album_ids.push(id),
            (Some(ProductKind::Merch), Some(id)) => merch_ids.push(id),
            _ => tracing::warn!(name = %item.name, "cart item without kind tag, skipped"),
        }
    }

    let summary = OrderSummary::of(cart);

    Ok(PurchaseRequest {
        purchase_price: summary.total.to_f64().unwrap_or(0.0),
        purchase_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        payment_method_id,
        song_ids,
        album_ids,
        merch_ids,
        shipping,
    })
}
