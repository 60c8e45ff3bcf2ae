//! EUR money helpers.
//!
//! The storefront trades in a single currency (EUR). Amounts are carried
//! as [`Decimal`] end to end and only rounded when formatted for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Spanish VAT rate applied to every purchase (21%).
pub const VAT_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

/// Format an amount as a 2-decimal EUR display string, e.g. `€12.10`.
///
/// Rounding happens here and only here; intermediate arithmetic keeps
/// full precision.
#[must_use]
pub fn format_eur(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("€{rounded:.2}")
}
