//! # Stock Ledger
//!
//! Keeps `Product::stock` consistent with recorded movements.
//!
//! ## Movement Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every change to a stock level produces a StockEntry                   │
//! │                                                                         │
//! │  Stock-in  (purchase)   ──► stock += q   ──► entry { in,  purchase }   │
//! │  Stock-out (adjustment) ──► stock -= q   ──► entry { out, adjustment } │
//! │  Checkout  (sale)       ──► stock -= q   ──► entry { out, sale, INV-x }│
//! │                                                                         │
//! │  A movement that would leave stock below zero is rejected whole.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sale Consumption
//! Checkout runs in two phases: [`plan_sale_consumption`] aggregates the
//! quantities per product and checks every product, then
//! [`ConsumptionPlan::apply`] decrements them. Nothing is written unless the
//! whole document fits in stock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{InvoiceItem, Product, StockDirection, StockEntry, StockReason};
use crate::validation::{validate_movement_quantity, validate_price};
use crate::MAX_STOCK_LEVEL;

// =============================================================================
// Status Tiers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Critical,
    Low,
    Normal,
}

/// Inclusive upper bounds of the stock tiers.
///
/// Independent from the dashboard's low-stock alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockThresholds {
    pub critical: i64,
    pub low: i64,
}

impl Default for StockThresholds {
    fn default() -> Self {
        StockThresholds {
            critical: 10,
            low: 20,
        }
    }
}

impl StockThresholds {
    pub fn status_for(&self, stock: i64) -> StockStatus {
        if stock <= self.critical {
            StockStatus::Critical
        } else if stock <= self.low {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }
}

// =============================================================================
// Single Movements
// =============================================================================

/// A requested stock movement.
#[derive(Debug, Clone)]
pub struct StockMovement {
    pub quantity: i64,
    pub direction: StockDirection,
    pub reason: StockReason,
    /// Unit cost to record; the product's purchase price when absent.
    pub purchase_price: Option<Money>,
    pub reference: Option<String>,
}

/// Who recorded a movement, and when.
#[derive(Debug, Clone)]
pub struct EntryStamp {
    pub date: NaiveDate,
    pub created_by: String,
}

/// Applies one movement to `product` and returns the ledger entry.
///
/// Every check runs and the entry is built before the product changes, so
/// the product is left unchanged on error.
pub fn apply_entry(
    product: &mut Product,
    movement: StockMovement,
    stamp: &EntryStamp,
) -> CoreResult<StockEntry> {
    validate_movement_quantity(movement.quantity)?;
    let purchase_price = movement.purchase_price.unwrap_or(product.purchase_price);
    validate_price("purchase price", purchase_price)?;

    let new_stock = match movement.direction {
        StockDirection::In => product
            .stock
            .checked_add(movement.quantity)
            .filter(|stock| *stock <= MAX_STOCK_LEVEL)
            .ok_or_else(stock_out_of_range)?,
        StockDirection::Out => {
            if product.stock < movement.quantity {
                return Err(CoreError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock,
                    requested: movement.quantity,
                });
            }
            product.stock - movement.quantity
        }
    };

    let total = purchase_price
        .checked_multiply_quantity(movement.quantity)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "total".to_string(),
            min: 0,
            max: i64::MAX,
        })?;

    let entry = StockEntry {
        id: Uuid::new_v4().to_string(),
        date: stamp.date,
        product_id: product.id.clone(),
        direction: movement.direction,
        reason: movement.reason,
        reference: movement.reference,
        quantity: movement.quantity,
        purchase_price,
        total,
        created_by: stamp.created_by.clone(),
    };
    product.stock = new_stock;
    Ok(entry)
}

fn stock_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "stock".to_string(),
        min: 0,
        max: MAX_STOCK_LEVEL,
    }
}

// =============================================================================
// Sale Consumption
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedDecrement {
    product_index: usize,
    product_id: String,
    quantity: i64,
}

/// Validated decrements for one sale document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionPlan {
    decrements: Vec<PlannedDecrement>,
}

impl ConsumptionPlan {
    /// Applies every decrement and records one sale entry per product.
    ///
    /// `products` must be the slice the plan was built from. Every planned
    /// product is looked up again before the first decrement; a mismatch
    /// fails the whole plan with nothing applied.
    pub fn apply(
        self,
        products: &mut [Product],
        stamp: &EntryStamp,
        reference: &str,
    ) -> CoreResult<Vec<StockEntry>> {
        for planned in &self.decrements {
            let product = products
                .get(planned.product_index)
                .filter(|p| p.id == planned.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(planned.product_id.clone()))?;
            if product.stock < planned.quantity {
                return Err(CoreError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock,
                    requested: planned.quantity,
                });
            }
        }

        let mut entries = Vec::with_capacity(self.decrements.len());
        for planned in self.decrements {
            let product = &mut products[planned.product_index];
            product.stock -= planned.quantity;
            entries.push(StockEntry {
                id: Uuid::new_v4().to_string(),
                date: stamp.date,
                product_id: planned.product_id,
                direction: StockDirection::Out,
                reason: StockReason::Sale,
                reference: Some(reference.to_string()),
                quantity: planned.quantity,
                purchase_price: product.purchase_price,
                total: product.purchase_price.multiply_quantity(planned.quantity),
                created_by: stamp.created_by.clone(),
            });
        }
        Ok(entries)
    }
}

/// Checks that every line of a sale can be served from stock.
///
/// Quantities are summed per product first, so two lines for the same part
/// are checked against its stock together.
pub fn plan_sale_consumption(
    products: &[Product],
    items: &[InvoiceItem],
) -> CoreResult<ConsumptionPlan> {
    let mut decrements: Vec<PlannedDecrement> = Vec::new();

    for item in items {
        let product_index = products
            .iter()
            .position(|p| p.id == item.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(item.product_id.clone()))?;

        match decrements.iter_mut().find(|d| d.product_index == product_index) {
            Some(planned) => planned.quantity += item.quantity,
            None => decrements.push(PlannedDecrement {
                product_index,
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            }),
        }
    }

    for planned in &decrements {
        let product = &products[planned.product_index];
        if product.stock < planned.quantity {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested: planned.quantity,
            });
        }
    }

    Ok(ConsumptionPlan { decrements })
}

/// Plans and applies sale consumption in one call: all lines or none.
pub fn consume_for_sale(
    products: &mut [Product],
    items: &[InvoiceItem],
    stamp: &EntryStamp,
    reference: &str,
) -> CoreResult<Vec<StockEntry>> {
    let plan = plan_sale_consumption(products, items)?;
    plan.apply(products, stamp, reference)
}

// =============================================================================
// Inventory Summary
// =============================================================================

/// Header figures of the stock screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_units: i64,
    /// Σ purchase price × stock
    pub stock_value: Money,
    pub critical_count: usize,
    pub low_count: usize,
}

pub fn summarize(products: &[Product], thresholds: StockThresholds) -> InventorySummary {
    let mut summary = InventorySummary {
        total_units: 0,
        stock_value: Money::zero(),
        critical_count: 0,
        low_count: 0,
    };
    for product in products {
        summary.total_units = summary.total_units.saturating_add(product.stock);
        summary.stock_value = summary.stock_value.saturating_add(product.stock_value());
        match thresholds.status_for(product.stock) {
            StockStatus::Critical => summary.critical_count += 1,
            StockStatus::Low => summary.low_count += 1,
            StockStatus::Normal => {}
        }
    }
    summary
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Part {id}"),
            barcode: String::new(),
            category_id: "1".to_string(),
            brand_id: "1".to_string(),
            compatible_cars: vec![],
            purchase_price: Money::from_xof(1_000),
            margin_bps: 0,
            selling_price_excluding_tax: Money::from_xof(1_000),
            selling_price_with_tax: Money::from_xof(1_180),
            stock,
            image: None,
        }
    }

    fn line(product_id: &str, quantity: i64) -> InvoiceItem {
        InvoiceItem {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            product_name: format!("Part {product_id}"),
            quantity,
            unit_price: Money::from_xof(1_180),
            total: Money::from_xof(1_180 * quantity),
            tax_included: true,
        }
    }

    fn stamp() -> EntryStamp {
        EntryStamp {
            date: NaiveDate::from_ymd_opt(2023, 10, 28).unwrap(),
            created_by: "1".to_string(),
        }
    }

    #[test]
    fn test_status_tiers() {
        let tiers = StockThresholds::default();
        assert_eq!(tiers.status_for(0), StockStatus::Critical);
        assert_eq!(tiers.status_for(10), StockStatus::Critical);
        assert_eq!(tiers.status_for(11), StockStatus::Low);
        assert_eq!(tiers.status_for(20), StockStatus::Low);
        assert_eq!(tiers.status_for(21), StockStatus::Normal);
    }

    #[test]
    fn test_stock_in_records_entry() {
        let mut p = product("1", 42);
        let movement = StockMovement {
            quantity: 20,
            direction: StockDirection::In,
            reason: StockReason::Purchase,
            purchase_price: Some(Money::from_xof(5_000)),
            reference: None,
        };
        let entry = apply_entry(&mut p, movement, &stamp()).unwrap();

        assert_eq!(p.stock, 62);
        assert_eq!(entry.total.xof(), 100_000);
        assert_eq!(entry.direction, StockDirection::In);
    }

    #[test]
    fn test_stock_out_is_recorded_and_guarded() {
        let mut p = product("1", 5);
        let out = |quantity| StockMovement {
            quantity,
            direction: StockDirection::Out,
            reason: StockReason::Adjustment,
            purchase_price: None,
            reference: None,
        };

        let entry = apply_entry(&mut p, out(3), &stamp()).unwrap();
        assert_eq!(p.stock, 2);
        assert_eq!(entry.purchase_price.xof(), 1_000);
        assert_eq!(entry.reason, StockReason::Adjustment);

        let err = apply_entry(&mut p, out(3), &stamp()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 2, requested: 3, .. }
        ));
        assert_eq!(p.stock, 2);
    }

    #[test]
    fn test_entry_rejects_zero_quantity() {
        let mut p = product("1", 5);
        let movement = StockMovement {
            quantity: 0,
            direction: StockDirection::In,
            reason: StockReason::Purchase,
            purchase_price: None,
            reference: None,
        };
        assert!(apply_entry(&mut p, movement, &stamp()).is_err());
        assert_eq!(p.stock, 5);
    }

    #[test]
    fn test_oversized_stock_in_leaves_product_unchanged() {
        let mut p = product("1", 10);
        let movement = |quantity| StockMovement {
            quantity,
            direction: StockDirection::In,
            reason: StockReason::Purchase,
            purchase_price: None,
            reference: None,
        };

        let err = apply_entry(&mut p, movement(2_000_000_000_000_000), &stamp()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(p.stock, 10);

        p.stock = MAX_STOCK_LEVEL - 5;
        assert!(apply_entry(&mut p, movement(6), &stamp()).is_err());
        assert_eq!(p.stock, MAX_STOCK_LEVEL - 5);

        let entry = apply_entry(&mut p, movement(5), &stamp()).unwrap();
        assert_eq!(p.stock, MAX_STOCK_LEVEL);
        assert_eq!(entry.total.xof(), 5_000);
    }

    #[test]
    fn test_stock_in_rejects_out_of_range_price() {
        let mut p = product("1", 10);
        let movement = StockMovement {
            quantity: 1,
            direction: StockDirection::In,
            reason: StockReason::Purchase,
            purchase_price: Some(Money::from_xof(i64::MAX / 4)),
            reference: None,
        };
        assert!(apply_entry(&mut p, movement, &stamp()).is_err());
        assert_eq!(p.stock, 10);
    }

    #[test]
    fn test_sale_consumption_decrements_every_line() {
        let mut products = vec![product("1", 42), product("3", 30), product("5", 50)];
        let items = vec![line("1", 2), line("3", 1), line("5", 4)];

        let entries = consume_for_sale(&mut products, &items, &stamp(), "INV-0004").unwrap();

        assert_eq!(products[0].stock, 40);
        assert_eq!(products[1].stock, 29);
        assert_eq!(products[2].stock, 46);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.reason == StockReason::Sale));
        assert!(entries.iter().all(|e| e.reference.as_deref() == Some("INV-0004")));
    }

    #[test]
    fn test_sale_consumption_is_all_or_nothing() {
        let mut products = vec![product("1", 42), product("2", 1)];
        let items = vec![line("1", 2), line("2", 5)];

        let err = consume_for_sale(&mut products, &items, &stamp(), "INV-0004").unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(products[0].stock, 42);
        assert_eq!(products[1].stock, 1);
    }

    #[test]
    fn test_sale_consumption_aggregates_same_product() {
        let mut products = vec![product("4", 3)];
        let mut ttc = line("4", 2);
        let mut ht = line("4", 2);
        ht.tax_included = false;
        ttc.tax_included = true;

        let err = consume_for_sale(&mut products, &[ttc.clone(), ht], &stamp(), "INV-0005");
        assert!(err.is_err());
        assert_eq!(products[0].stock, 3);

        let entries = consume_for_sale(&mut products, &[ttc], &stamp(), "INV-0005").unwrap();
        assert_eq!(entries[0].quantity, 2);
        assert_eq!(products[0].stock, 1);
    }

    #[test]
    fn test_sale_consumption_unknown_product() {
        let mut products = vec![product("1", 42)];
        let err = consume_for_sale(&mut products, &[line("9", 1)], &stamp(), "INV-0004");
        assert!(matches!(err, Err(CoreError::ProductNotFound(id)) if id == "9"));
        assert_eq!(products[0].stock, 42);
    }

    #[test]
    fn test_plan_against_other_products_applies_nothing() {
        let products = vec![product("1", 42), product("2", 5)];
        let plan = plan_sale_consumption(&products, &[line("1", 2), line("2", 1)]).unwrap();

        let mut other = vec![product("1", 42), product("7", 5)];
        let err = plan.apply(&mut other, &stamp(), "INV-0004").unwrap_err();

        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "2"));
        assert_eq!(other[0].stock, 42);
        assert_eq!(other[1].stock, 5);
    }

    #[test]
    fn test_summarize() {
        let products = vec![product("1", 42), product("2", 15), product("3", 8)];
        let summary = summarize(&products, StockThresholds::default());

        assert_eq!(summary.total_units, 65);
        assert_eq!(summary.stock_value.xof(), 65_000);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.low_count, 1);
    }
}
