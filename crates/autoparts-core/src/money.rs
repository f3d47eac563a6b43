//! # Money Module
//!
//! Provides the `Money` type for handling XOF amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    56250 × 1.18 = 66374.99999999999  ❌ WRONG!                          │
//! │                                                                         │
//! │  OUR SOLUTION: Whole XOF + basis points                                 │
//! │    The franc CFA has no minor unit, so one Money unit = 1 XOF.          │
//! │    Rates are basis points (1800 = 18%) and every derived amount is      │
//! │    rounded half-up, once, at the step that produces it.                 │
//! │    56250 × 11800 / 10000 = 66375  ✅                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use autoparts_core::money::Money;
//!
//! let price = Money::from_xof(7_670);
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.xof(), 15_340);
//! assert_eq!(line.to_string(), "15 340 XOF");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Basis points in 100%.
pub(crate) const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole XOF.
///
/// ## Design Decisions
/// - **i64 (signed)**: profit and balances can be negative
/// - **Single field tuple struct**: serializes as a plain JSON number
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.purchase_price ──► derive_prices ──► selling prices (HT/TTC)  │
/// │                                                   │                     │
/// │                                                   ▼                     │
/// │  InvoiceItem.unit_price ──► InvoiceItem.total ──► DocumentTotals       │
/// │                                                   │                     │
/// │                                                   ▼                     │
/// │  Invoice.total ──► loyalty points, dashboard, monthly sales            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole francs.
    #[inline]
    pub const fn from_xof(xof: i64) -> Self {
        Money(xof)
    }

    /// Returns the value in whole francs.
    #[inline]
    pub const fn xof(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `bps` basis points of this amount, rounded half-up.
    ///
    /// ## Example
    /// ```rust
    /// use autoparts_core::money::Money;
    ///
    /// // 25% of 45 000
    /// assert_eq!(Money::from_xof(45_000).percentage_of(2_500).xof(), 11_250);
    /// // 30% of 5 = 1.5 → 2
    /// assert_eq!(Money::from_xof(5).percentage_of(3_000).xof(), 2);
    /// ```
    pub fn percentage_of(&self, bps: u32) -> Money {
        Money(round_div(self.0 as i128 * bps as i128, BPS_SCALE))
    }

    /// Calculates the tax owed on this tax-excluded amount.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, computed in i128 so
    /// large amounts cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use autoparts_core::money::Money;
    /// use autoparts_core::types::TaxRate;
    ///
    /// let tax = Money::from_xof(56_250).calculate_tax(TaxRate::from_bps(1_800));
    /// assert_eq!(tax.xof(), 10_125);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.percentage_of(rate.bps())
    }

    /// Removes a tax from this tax-included amount, returning the part
    /// before tax rounded half-up.
    ///
    /// A zero rate returns the amount unchanged.
    pub fn exclude_tax(&self, rate: TaxRate) -> Money {
        if rate.is_zero() {
            return *self;
        }
        let divisor = BPS_SCALE + rate.bps() as i128;
        Money(round_div(self.0 as i128 * BPS_SCALE, divisor))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Ampoule phare NGK 4 956 XOF
    /// Quantity: 4
    ///      │
    ///      ▼
    /// multiply_quantity(4) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: 19 824 XOF
    /// ```
    ///
    /// Amounts and quantities are bounded by validation (see
    /// [`crate::MAX_AMOUNT_XOF`]); use [`Money::checked_multiply_quantity`]
    /// where the factors come from unbounded input.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies money by a quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }

    /// Adds two amounts, clamping at the `i64` bounds.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Returns `part / whole` in basis points (0 when `whole` is zero).
    pub fn share_bps(part: Money, whole: Money) -> u32 {
        if whole.0 <= 0 || part.0 <= 0 {
            return 0;
        }
        round_div(part.0 as i128 * BPS_SCALE, whole.0 as i128) as u32
    }
}

/// Integer division rounding half away from zero.
///
/// `denominator` must be positive. Results outside `i64` clamp to its bounds.
pub(crate) fn round_div(numerator: i128, denominator: i128) -> i64 {
    let half = denominator / 2;
    let rounded = if numerator >= 0 {
        numerator.saturating_add(half) / denominator
    } else {
        numerator.saturating_sub(half) / denominator
    };
    rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays the amount with space-grouped thousands, as printed on
/// receipts: `66 375 XOF`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} {}", sign, grouped, crate::CURRENCY_CODE)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_xof(66_375).to_string(), "66 375 XOF");
        assert_eq!(Money::from_xof(1_250_000).to_string(), "1 250 000 XOF");
        assert_eq!(Money::from_xof(950).to_string(), "950 XOF");
        assert_eq!(Money::from_xof(0).to_string(), "0 XOF");
        assert_eq!(Money::from_xof(-45_000).to_string(), "-45 000 XOF");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_xof(1000);
        let b = Money::from_xof(500);

        assert_eq!((a + b).xof(), 1500);
        assert_eq!((a - b).xof(), 500);
        assert_eq!((a * 3).xof(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.xof(), 2000);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_xof(5_000);
        assert_eq!(price.checked_multiply_quantity(20), Some(Money::from_xof(100_000)));
        assert_eq!(price.checked_multiply_quantity(2_000_000_000_000_000), None);
        assert_eq!(Money::from_xof(i64::MAX).checked_add(Money::from_xof(1)), None);
        assert_eq!(
            Money::from_xof(i64::MAX).saturating_add(Money::from_xof(1)).xof(),
            i64::MAX
        );
    }

    #[test]
    fn test_round_div_clamps() {
        assert_eq!(round_div(i128::MAX, 1), i64::MAX);
        assert_eq!(round_div(i128::MIN, 1), i64::MIN);
        assert_eq!(round_div(15, 10), 2);
        assert_eq!(round_div(-15, 10), -2);
    }

    #[test]
    fn test_tax_calculation_rounds_half_up() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(Money::from_xof(56_250).calculate_tax(rate).xof(), 10_125);
        // 25 × 18% = 4.5 → 5
        assert_eq!(Money::from_xof(25).calculate_tax(rate).xof(), 5);
        // 24 × 18% = 4.32 → 4
        assert_eq!(Money::from_xof(24).calculate_tax(rate).xof(), 4);
    }

    #[test]
    fn test_exclude_tax() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(Money::from_xof(66_375).exclude_tax(rate).xof(), 56_250);
        assert_eq!(Money::from_xof(32_332).exclude_tax(rate).xof(), 27_400);
        assert_eq!(Money::from_xof(100).exclude_tax(TaxRate::zero()).xof(), 100);
    }

    #[test]
    fn test_round_div_is_symmetric() {
        assert_eq!(round_div(15, 10), 2);
        assert_eq!(round_div(14, 10), 1);
        assert_eq!(round_div(-15, 10), -2);
        assert_eq!(round_div(-14, 10), -1);
    }

    #[test]
    fn test_share_bps() {
        assert_eq!(Money::share_bps(Money::from_xof(150_000), Money::from_xof(510_000)), 2941);
        assert_eq!(Money::share_bps(Money::from_xof(10), Money::zero()), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(Money::from_xof(-1).is_negative());
        assert_eq!(Money::default(), zero);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_xof(7670)).unwrap();
        assert_eq!(json, "7670");
    }
}
