//! Order summary arithmetic.
//!
//! Pure derivation from the current cart: `subtotal` is the plain sum of
//! unit prices, `tax` applies the fixed 21% VAT, `total = subtotal + tax`.
//! No rounding is applied mid-sum; amounts are only rounded to two
//! decimals when formatted for display.

use rust_decimal::Decimal;

use oversound_core::VAT_RATE;

use crate::models::CartItem;

/// Subtotal, tax and total for the current cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Compute the summary for a cart snapshot.
    #[must_use]
    pub fn of(cart: &[CartItem]) -> Self {
        let subtotal: Decimal = cart.iter().map(|item| item.price).sum();
        let tax = subtotal * VAT_RATE;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str) -> CartItem {
        CartItem {
            name: name.to_string(),
            price: price.parse().unwrap(),
            song_id: Some(1),
            album_id: None,
            merch_id: None,
            cover: None,
        }
    }

    #[test]
    fn test_empty_cart_sums_to_zero() {
        let summary = OrderSummary::of(&[]);
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_tax_law() {
        // subtotal 10.00 -> tax 2.10, total 12.10
        let summary = OrderSummary::of(&[item("A", "10.00")]);
        assert_eq!(summary.tax, "2.1000".parse().unwrap());
        assert_eq!(summary.total, "12.1000".parse().unwrap());
    }

    #[test]
    fn test_end_to_end_scenario_amounts() {
        // Song A 5.00 + Album B 20.00 -> 25.00 / 5.25 / 30.25
        let summary = OrderSummary::of(&[item("Song A", "5.00"), item("Album B", "20.00")]);
        assert_eq!(summary.subtotal, "25.00".parse().unwrap());
        assert_eq!(summary.tax, "5.2500".parse().unwrap());
        assert_eq!(summary.total, "30.2500".parse().unwrap());
    }

    #[test]
    fn test_no_mid_sum_rounding() {
        // Three thirds of a cent survive the sum unrounded
        let summary = OrderSummary::of(&[item("A", "0.333"), item("B", "0.333"), item("C", "0.334")]);
        assert_eq!(summary.subtotal, "1.000".parse().unwrap());
    }
}
