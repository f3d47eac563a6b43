//! # autoparts-core: Commerce Rules for the Auto-Parts Back-Office
//!
//! This crate is the **heart** of the back-office. Every screen that shows a
//! price, a cart total, a stock level or a loyalty balance gets it from here,
//! so the numbers agree everywhere.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Auto-Parts Back-Office Architecture                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser Front-End                            │   │
//! │  │   POS ──► Proforma ──► Invoices ──► Stock ──► Dashboard        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    backoffice-api (axum)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ autoparts-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ pricing  │ │ document │ │  stock   │ │ loyalty  │          │   │
//! │  │   │ margins  │ │  cart /  │ │  ledger  │ │ accrual  │          │   │
//! │  │   │   VAT    │ │ proforma │ │  tiers   │ │          │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ registry │ │ catalog  │ │ finance  │ │analytics │          │   │
//! │  │   │ INV/PRO  │ │ customer │ │ expenses │ │dashboard │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              autoparts-db (tables, seed, key-value store)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Whole-XOF money with half-up rounding
//! - [`pricing`] - Margin and VAT derivation, tax-included splits
//! - [`document`] - Cart / proforma aggregator and totals
//! - [`stock`] - Stock ledger, tiers, atomic sale consumption
//! - [`loyalty`] - Loyalty point accrual on finalized sales
//! - [`registry`] - Invoice/proforma registry with unique ids
//! - [`catalog`], [`customer`], [`finance`] - Drafts and list filters
//! - [`analytics`] - Dashboard and sales statistics
//! - [`session`] - Signed-in user and company profile context
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use autoparts_core::pricing::derive_prices;
//! use autoparts_core::{Margin, Money, VAT_RATE};
//!
//! let prices = derive_prices(Money::from_xof(45_000), Margin::from_percent(25), VAT_RATE);
//! assert_eq!(prices.excluding_tax.xof(), 56_250);
//! assert_eq!(prices.including_tax.xof(), 66_375);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod catalog;
pub mod customer;
pub mod document;
pub mod error;
pub mod finance;
pub mod loyalty;
pub mod money;
pub mod pricing;
pub mod registry;
pub mod session;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Value-added tax applied to every selling price (18%).
///
/// The rate is fixed for the store; it is still passed explicitly to the
/// pricing functions so a zero rate can be exercised in tests.
pub const VAT_RATE: TaxRate = TaxRate::from_bps(1800);

/// ISO code of the only currency the store handles.
pub const CURRENCY_CODE: &str = "XOF";

/// Maximum number of lines on a single cart or proforma.
pub const MAX_DOCUMENT_LINES: usize = 100;

/// Maximum quantity on a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest price or expense amount accepted, in XOF.
///
/// ## Headroom
/// ```text
/// purchase price     1 000 000 000
/// × margin (≤ 1000%)            11   → HT   11 000 000 000
/// × VAT                       1.18   → TTC  12 980 000 000
/// × MAX_ITEM_QUANTITY          999   → line ≈ 1.3e13
/// × MAX_DOCUMENT_LINES         100   → document ≈ 1.3e15  (i64 ≈ 9.2e18)
/// ```
pub const MAX_AMOUNT_XOF: i64 = 1_000_000_000;

/// Largest unit price a document line accepts: the TTC price of a part
/// bought at MAX_AMOUNT_XOF with the largest margin, rounded up.
pub const MAX_UNIT_PRICE_XOF: i64 = 13_000_000_000;

/// Largest quantity of a single manual stock movement.
pub const MAX_MOVEMENT_QUANTITY: i64 = 100_000;

/// Largest stock level a product may reach.
pub const MAX_STOCK_LEVEL: i64 = 10_000_000;

/// Amount (XOF) that earns one loyalty point.
pub const LOYALTY_POINT_VALUE: i64 = 1000;

/// Stock level at or below which the dashboard raises a low-stock alert.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 20;
