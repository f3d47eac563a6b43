//! # Domain Types
//!
//! Core domain types used throughout the back-office.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Invoice      │   │   Customer      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  purchase_price │   │  INV-/PRO- id   │   │  loyalty_points │       │
//! │  │  margin_bps     │   │  items (snap)   │   │  total_purchases│       │
//! │  │  prices HT/TTC  │   │  subtotal/tax   │   │  last_purchase  │       │
//! │  │  stock          │   │  paid, type     │   └─────────────────┘       │
//! │  └────────┬────────┘   └─────────────────┘                              │
//! │           │                                                             │
//! │  ┌────────▼────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   StockEntry    │   │    Expense      │   │ Category/Brand/ │       │
//! │  │  in | out       │   │  category       │   │ CarModel (ref)  │       │
//! │  │  purchase|sale  │   │  amount         │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Seeded rows keep their short fixture ids (`"1"`, `"INV-002"`); rows created
//! at runtime get a UUID v4, documents get a counter-based `INV-0004` id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::stock::{StockStatus, StockThresholds};

// =============================================================================
// Rates
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1800 bps = 18% VAT.
/// The type is unsigned: a negative rate cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// Markup applied on top of the purchase price, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margin(u32);

impl Margin {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Margin(bps)
    }

    /// Whole-percent margin, the way the catalog screen enters it.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Margin(percent * 100)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including analytics, finance and settings.
    Admin,
    /// Point of sale, catalog, stock, invoices and customers.
    Seller,
}

/// A back-office user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// =============================================================================
// Reference Data
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
}

/// A vehicle model that parts can be declared compatible with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CarModel {
    pub id: String,
    /// Manufacturer, e.g. "Toyota".
    pub brand: String,
    pub name: String,
    /// Production ranges, e.g. "2018-2023".
    pub years: Vec<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A part in the catalog.
///
/// Selling prices are derived from `purchase_price` and `margin_bps` by
/// [`crate::pricing::derive_prices`] and stored, so lists never recompute them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// EAN barcode, empty when the part has none.
    pub barcode: String,
    pub category_id: String,
    pub brand_id: String,
    /// Ids of compatible [`CarModel`]s.
    pub compatible_cars: Vec<String>,
    /// Purchase price, tax excluded.
    pub purchase_price: Money,
    /// Margin in basis points (2500 = 25%).
    pub margin_bps: u32,
    pub selling_price_excluding_tax: Money,
    pub selling_price_with_tax: Money,
    pub stock: i64,
    pub image: Option<String>,
}

impl Product {
    #[inline]
    pub fn margin(&self) -> Margin {
        Margin::from_bps(self.margin_bps)
    }

    /// Re-derives both selling prices from purchase price and margin.
    pub fn reprice(&mut self, rate: TaxRate) {
        let prices = crate::pricing::derive_prices(self.purchase_price, self.margin(), rate);
        self.selling_price_excluding_tax = prices.excluding_tax;
        self.selling_price_with_tax = prices.including_tax;
    }

    /// Value of the units on hand at purchase price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.purchase_price.multiply_quantity(self.stock)
    }

    #[inline]
    pub fn stock_status(&self, thresholds: StockThresholds) -> StockStatus {
        thresholds.status_for(self.stock)
    }

    /// Case-insensitive name match or barcode substring match.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle.to_lowercase()) || self.barcode.contains(needle)
    }
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockDirection {
    In,
    Out,
}

/// Why a stock movement happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockReason {
    /// Goods received from a supplier.
    Purchase,
    /// Manual correction (breakage, count).
    Adjustment,
    /// Consumed by a sale invoice.
    Sale,
}

/// One recorded stock movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub product_id: String,
    pub direction: StockDirection,
    pub reason: StockReason,
    /// Invoice id for sale consumption.
    pub reference: Option<String>,
    pub quantity: i64,
    pub purchase_price: Money,
    /// `quantity × purchase_price`
    pub total: Money,
    pub created_by: String,
}

// =============================================================================
// Documents
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Finalized sale invoice.
    Sale,
    /// Non-binding quote.
    Proforma,
}

impl DocumentType {
    /// Identifier prefix, without the dash.
    pub const fn prefix(&self) -> &'static str {
        match self {
            DocumentType::Sale => "INV",
            DocumentType::Proforma => "PRO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// A line on an invoice or proforma.
///
/// Uses the snapshot pattern: name and unit price are frozen when the line is
/// added and never follow later catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// `quantity × unit_price`
    pub total: Money,
    /// Whether `unit_price` is TTC (true) or HT (false).
    pub tax_included: bool,
}

impl InvoiceItem {
    pub(crate) fn recompute_total(&mut self) {
        self.total = self.unit_price.multiply_quantity(self.quantity);
    }
}

/// A sale invoice or a proforma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub customer_id: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub paid: bool,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub created_by: String,
    pub payment_method: Option<PaymentMethod>,
    /// Proforma this sale was created from.
    pub converted_from: Option<String>,
    /// Sale created from this proforma.
    pub converted_to: Option<String>,
}

impl Invoice {
    #[inline]
    pub fn is_sale(&self) -> bool {
        self.document_type == DocumentType::Sale
    }

    /// Sum of line quantities.
    pub fn quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Customers & Expenses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub loyalty_points: i64,
    #[ts(as = "Option<String>")]
    pub last_purchase: Option<NaiveDate>,
    pub total_purchases: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub category: String,
    pub amount: Money,
    pub description: String,
}

// =============================================================================
// Company Profile
// =============================================================================

pub const DEFAULT_COMPANY_NAME: &str = "Auto Parts Store";

pub const DEFAULT_COMPANY_LOGO: &str = "https://images.unsplash.com/photo-1605559424843-9e4c228bf1c2?ixlib=rb-4.0.3&ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&auto=format&fit=crop&w=256&q=80";

/// Store name and logo shown on every screen and document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyProfile {
    pub name: String,
    /// URL or data URI.
    pub logo: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        CompanyProfile {
            name: DEFAULT_COMPANY_NAME.to_string(),
            logo: DEFAULT_COMPANY_LOGO.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VAT_RATE;

    fn battery() -> Product {
        Product {
            id: "2".to_string(),
            name: "Batterie Bosch S4".to_string(),
            barcode: "4007954321098".to_string(),
            category_id: "4".to_string(),
            brand_id: "1".to_string(),
            compatible_cars: vec!["1".to_string()],
            purchase_price: Money::from_xof(45_000),
            margin_bps: 2_500,
            selling_price_excluding_tax: Money::zero(),
            selling_price_with_tax: Money::zero(),
            stock: 15,
            image: None,
        }
    }

    #[test]
    fn test_margin_from_percent() {
        assert_eq!(Margin::from_percent(25).bps(), 2_500);
    }

    #[test]
    fn test_product_reprice() {
        let mut product = battery();
        product.reprice(VAT_RATE);
        assert_eq!(product.selling_price_excluding_tax.xof(), 56_250);
        assert_eq!(product.selling_price_with_tax.xof(), 66_375);
        assert_eq!(product.stock_value().xof(), 675_000);
    }

    #[test]
    fn test_product_search_matches_name_or_barcode() {
        let product = battery();
        assert!(product.matches_search("bosch"));
        assert!(product.matches_search("79543"));
        assert!(product.matches_search(""));
        assert!(!product.matches_search("valeo"));
    }

    #[test]
    fn test_invoice_serializes_type_field() {
        let invoice = Invoice {
            id: "INV-002".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 10, 26).unwrap(),
            customer_id: Some("2".to_string()),
            items: vec![],
            subtotal: Money::from_xof(56_250),
            tax: Money::from_xof(10_125),
            total: Money::from_xof(66_375),
            paid: true,
            document_type: DocumentType::Sale,
            created_by: "2".to_string(),
            payment_method: None,
            converted_from: None,
            converted_to: None,
        };
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["type"], "sale");
        assert_eq!(json["customerId"], "2");
        assert_eq!(json["date"], "2023-10-26");
        assert_eq!(json["total"], 66_375);
    }

    #[test]
    fn test_company_profile_default() {
        let profile = CompanyProfile::default();
        assert_eq!(profile.name, "Auto Parts Store");
        assert!(profile.logo.starts_with("https://"));
    }
}
