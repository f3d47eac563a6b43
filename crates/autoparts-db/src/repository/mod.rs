//! # Repository Module
//!
//! Repository implementations for the back-office tables.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │  db.invoices().checkout(&mut cart, method, stamp)              │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │       │  tables.write().await   ← one guard per mutation               │
//! │       │  core rules: aggregate → plan stock → register → accrue        │
//! │       ▼                                                                 │
//! │  Tables (in memory) / key_value_store (SQLite)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Catalog CRUD and reference data
//! - [`CustomerRepository`] - Customer CRUD
//! - [`InventoryRepository`] - Stock ledger entries and summary
//! - [`InvoiceRepository`] - Documents, checkout, proformas, conversion
//! - [`ExpenseRepository`] - Expenses
//! - [`ReportRepository`] - Dashboard, analytics, finance
//! - [`SessionRepository`] - Sign-in state and company profile

pub mod customer;
pub mod expense;
pub mod inventory;
pub mod invoice;
pub mod product;
pub mod report;
pub mod session;

pub use customer::CustomerRepository;
pub use expense::ExpenseRepository;
pub use inventory::{InventoryRepository, StockEntryRequest};
pub use invoice::{InvoiceRepository, ProformaLine, ProformaRequest};
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use session::SessionRepository;

/// Helper to generate a new entity ID.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
