//! # autoparts-db: Data Layer for the Autoparts Back-Office
//!
//! Owns the business tables, applies every mutation through the commerce
//! rules of `autoparts-core`, and persists the session blobs in SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          autoparts-db                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       Database                                  │   │
//! │  │   pool: SqlitePool            tables: Arc<RwLock<Tables>>       │   │
//! │  └───────┬──────────────────────────────────┬──────────────────────┘   │
//! │          │                                  │                           │
//! │  ┌───────▼────────┐   ┌─────────────────────▼─────────────────────┐    │
//! │  │SessionRepository│   │ Product / Customer / Inventory / Invoice │    │
//! │  │ user,          │   │ Expense / Report repositories            │    │
//! │  │ companyInfo    │   │                                           │    │
//! │  └───────┬────────┘   └─────────────────────┬─────────────────────┘    │
//! │          │                                  │                           │
//! │          ▼                                  ▼                           │
//! │   key_value_store (file)          seeded tables (memory, reset on      │
//! │                                   every start)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use autoparts_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::in_memory()).await?;
//! let invoice = db.invoices().checkout(&mut cart, PaymentMethod::Cash, &stamp).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;
pub mod tables;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{
    CustomerRepository, ExpenseRepository, InventoryRepository, InvoiceRepository, ProductRepository,
    ProformaLine, ProformaRequest, ReportRepository, SessionRepository, StockEntryRequest,
};
pub use seed::DEMO_PASSWORD;
