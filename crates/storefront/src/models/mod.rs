//! Wire types for the shop service and the checkout flow.
//!
//! These are server-shaped: the storefront treats them as read-only
//! snapshots and never merges local deltas into them.

pub mod session;

pub use session::{PendingDeletion, session_keys};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use oversound_core::ProductKind;

// =============================================================================
// Cart
// =============================================================================

/// One line of the server-held cart.
///
/// Exactly one of `song_id` / `album_id` / `merch_id` is expected to be
/// present; the presence of the field, not a separate enum, identifies the
/// product kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Display name.
    pub name: String,
    /// Unit price in EUR; the service has emitted both JSON strings and
    /// numbers here, so both are accepted.
    #[serde(default, deserialize_with = "de_flexible_decimal")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merch_id: Option<i64>,
    /// Relative path to a product image on the media service; a
    /// kind-specific default asset is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl CartItem {
    /// Resolve the item's kind tag.
    ///
    /// If the service ever sends more than one id field, the first match
    /// wins (song, then album, then merch); an untagged item has no kind.
    #[must_use]
    pub const fn kind(&self) -> Option<ProductKind> {
        if self.song_id.is_some() {
            Some(ProductKind::Song)
        } else if self.album_id.is_some() {
            Some(ProductKind::Album)
        } else if self.merch_id.is_some() {
            Some(ProductKind::Merch)
        } else {
            None
        }
    }

    /// The id matching the item's kind.
    #[must_use]
    pub const fn product_id(&self) -> Option<i64> {
        match self.kind() {
            Some(ProductKind::Song) => self.song_id,
            Some(ProductKind::Album) => self.album_id,
            Some(ProductKind::Merch) => self.merch_id,
            None => None,
        }
    }
}

/// Accept a price as either a JSON number or a decimal string; `null` and
/// absent both mean zero.
fn de_flexible_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(f64),
        None,
    }

    match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::Num(n) => Decimal::try_from(n).map_err(serde::de::Error::custom),
        Raw::None => Ok(Decimal::ZERO),
    }
}

// =============================================================================
// Payment methods
// =============================================================================

/// A registered payment method.
///
/// The payment service has emitted both snake_case and camelCase field
/// names over time, so both are accepted; every display field is derived
/// defensively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(alias = "paymentMethodId")]
    pub id: i64,
    #[serde(default, alias = "cardHolder")]
    pub card_holder: String,
    /// Full or already-masked card number.
    #[serde(default, alias = "cardNumber")]
    pub card_number: String,
    /// 1-12.
    #[serde(default, alias = "expireMonth")]
    pub expire_month: u32,
    /// 4-digit year.
    #[serde(default, alias = "expireYear")]
    pub expire_year: u32,
}

impl PaymentMethod {
    /// Last four digits of the card number, however masked it arrived.
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        digits.iter().rev().take(4).rev().collect()
    }

    /// Expiry formatted as `MM/YY`.
    #[must_use]
    pub fn expiry(&self) -> String {
        let year = self.expire_year % 100;
        format!("{:02}/{:02}", self.expire_month, year)
    }

    /// Card brand detected from the leading digit.
    #[must_use]
    pub fn brand(&self) -> &'static str {
        let number: String = self.card_number.chars().filter(|c| !c.is_whitespace()).collect();
        match number.chars().next() {
            Some('4') => "Visa",
            Some('5' | '2') => "Mastercard",
            Some('3') => "American Express",
            Some('6') => "Discover",
            Some(_) => "Crédito",
            None => "Desconocido",
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Shipping address captured once per checkout attempt.
///
/// Held only in memory for the duration of the purchase submission and
/// discarded after. Only sent to the shop service when the
/// `send_shipping` config flag is on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

/// Purchase submission body for `POST /purchase`.
///
/// camelCase on the wire to match the payment service's model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Total price including VAT.
    pub purchase_price: f64,
    /// ISO-8601 timestamp of the purchase.
    pub purchase_date: String,
    pub payment_method_id: i64,
    pub song_ids: Vec<i64>,
    pub album_ids: Vec<i64>,
    pub merch_ids: Vec<i64>,
    /// Extension point: populated only when `send_shipping` is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingInfo>,
}
