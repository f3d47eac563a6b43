//! # Pricing Calculator
//!
//! Derives selling prices from purchase price and margin, and splits
//! tax-included amounts back into their HT and tax parts.
//!
//! ## Price Derivation
//! ```text
//! purchase_price ──(× (1 + margin))──► excluding_tax (HT) ──(× 1.18)──► including_tax (TTC)
//!     45 000             25%               56 250                          66 375
//! ```
//!
//! ## Rounding
//! Each step rounds half-up to the whole franc before the next step runs,
//! so the stored HT price is exactly what the TTC price is derived from.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Margin, TaxRate};

/// Selling prices derived from a purchase price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub excluding_tax: Money,
    pub including_tax: Money,
}

/// A tax-included amount split into its parts.
///
/// `excluding_tax + tax` always equals the amount that was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxSplit {
    pub excluding_tax: Money,
    pub tax: Money,
}

/// Applies margin then tax to a purchase price.
///
/// ## Example
/// ```rust
/// use autoparts_core::pricing::derive_prices;
/// use autoparts_core::{Margin, Money, VAT_RATE};
///
/// let prices = derive_prices(Money::from_xof(5_000), Margin::from_percent(30), VAT_RATE);
/// assert_eq!(prices.excluding_tax.xof(), 6_500);
/// assert_eq!(prices.including_tax.xof(), 7_670);
/// ```
pub fn derive_prices(purchase_price: Money, margin: Margin, rate: TaxRate) -> PriceBreakdown {
    let excluding_tax = purchase_price.saturating_add(purchase_price.percentage_of(margin.bps()));
    PriceBreakdown {
        excluding_tax,
        including_tax: add_tax(excluding_tax, rate),
    }
}

/// Returns `amount` with `rate` added, clamped at the `i64` bound.
pub fn add_tax(amount: Money, rate: TaxRate) -> Money {
    amount.saturating_add(amount.calculate_tax(rate))
}

/// Splits a tax-included amount into its HT part and its tax.
///
/// A zero rate yields `(amount, 0)` rather than dividing by one.
pub fn split_tax_included(amount: Money, rate: TaxRate) -> TaxSplit {
    let excluding_tax = amount.exclude_tax(rate);
    TaxSplit {
        excluding_tax,
        tax: amount - excluding_tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VAT_RATE;

    #[test]
    fn test_battery_scenario() {
        let prices = derive_prices(Money::from_xof(45_000), Margin::from_percent(25), VAT_RATE);
        assert_eq!(prices.excluding_tax.xof(), 56_250);
        assert_eq!(prices.including_tax.xof(), 66_375);
    }

    #[test]
    fn test_catalog_fixture_prices() {
        let cases = [
            (5_000, 30, 6_500, 7_670),
            (45_000, 25, 56_250, 66_375),
            (12_000, 20, 14_400, 16_992),
            (18_000, 35, 24_300, 28_674),
            (3_000, 40, 4_200, 4_956),
        ];
        for (purchase, margin, ht, ttc) in cases {
            let prices =
                derive_prices(Money::from_xof(purchase), Margin::from_percent(margin), VAT_RATE);
            assert_eq!(prices.excluding_tax.xof(), ht, "HT for {purchase}");
            assert_eq!(prices.including_tax.xof(), ttc, "TTC for {purchase}");
        }
    }

    #[test]
    fn test_prices_never_below_purchase_price() {
        for purchase in [0, 1, 7, 999, 12_345, 1_000_000] {
            for margin_bps in [0, 1, 50, 2_500, 10_000, 35_000] {
                let purchase = Money::from_xof(purchase);
                let prices = derive_prices(purchase, Margin::from_bps(margin_bps), VAT_RATE);
                assert!(prices.excluding_tax >= purchase);
                assert!(prices.including_tax >= prices.excluding_tax);
            }
        }
    }

    #[test]
    fn test_huge_purchase_price_clamps() {
        let prices = derive_prices(Money::from_xof(i64::MAX / 4), Margin::from_bps(100_000), VAT_RATE);
        assert_eq!(prices.including_tax.xof(), i64::MAX);
    }

    #[test]
    fn test_zero_margin_only_adds_tax() {
        let prices = derive_prices(Money::from_xof(10_000), Margin::default(), VAT_RATE);
        assert_eq!(prices.excluding_tax.xof(), 10_000);
        assert_eq!(prices.including_tax.xof(), 11_800);
    }

    #[test]
    fn test_split_matches_invoice_fixture() {
        let split = split_tax_included(Money::from_xof(66_375), VAT_RATE);
        assert_eq!(split.excluding_tax.xof(), 56_250);
        assert_eq!(split.tax.xof(), 10_125);
    }

    #[test]
    fn test_split_parts_sum_to_amount() {
        for amount in [0, 1, 3, 118, 4_956, 19_824, 28_674, 99_999] {
            let amount = Money::from_xof(amount);
            let split = split_tax_included(amount, VAT_RATE);
            assert_eq!(split.excluding_tax + split.tax, amount);
        }
    }

    #[test]
    fn test_split_with_zero_rate() {
        let split = split_tax_included(Money::from_xof(4_956), TaxRate::zero());
        assert_eq!(split.excluding_tax.xof(), 4_956);
        assert!(split.tax.is_zero());
    }
}
