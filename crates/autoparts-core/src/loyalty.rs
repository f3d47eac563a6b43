//! # Customer Loyalty Accrual
//!
//! One point per full 1 000 XOF of a finalized sale. No decay, expiry or
//! redemption.

use crate::money::Money;
use crate::types::{Customer, Invoice};
use crate::LOYALTY_POINT_VALUE;

/// Points earned by a sale of `total`.
///
/// ## Example
/// ```rust
/// use autoparts_core::loyalty::points_for;
/// use autoparts_core::Money;
///
/// assert_eq!(points_for(Money::from_xof(66_375)), 66);
/// assert_eq!(points_for(Money::from_xof(999)), 0);
/// ```
pub fn points_for(total: Money) -> i64 {
    if total.is_negative() {
        return 0;
    }
    total.xof() / LOYALTY_POINT_VALUE
}

/// Credits `customer` for `invoice`.
///
/// Returns the points awarded. Proformas and invoices that belong to another
/// customer (or to none) award nothing and leave the customer untouched.
pub fn accrue(customer: &mut Customer, invoice: &Invoice) -> i64 {
    if !invoice.is_sale() || invoice.customer_id.as_deref() != Some(customer.id.as_str()) {
        return 0;
    }

    let points = points_for(invoice.total);
    customer.loyalty_points += points;
    customer.total_purchases += 1;
    customer.last_purchase = Some(invoice.date);
    points
}

// =============================================================================
// Unit Tests
// =============================================================================
