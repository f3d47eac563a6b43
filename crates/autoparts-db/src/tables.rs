//! # Tables
//!
//! The in-memory business tables and the lock that guards them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SharedTables = Arc<RwLock<Tables>>                                     │
//! │                                                                         │
//! │  read()  ──► lists, lookups, dashboard      (many at once)              │
//! │  write() ──► every mutation                 (one at a time)             │
//! │                                                                         │
//! │  A mutation validates everything it needs while holding the write      │
//! │  guard, then applies its changes. A rejected request therefore leaves  │
//! │  every table exactly as it found it.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lists that grow (stock entries, expenses, documents) are kept newest first.

use std::sync::Arc;

use autoparts_core::catalog::CatalogRefs;
use autoparts_core::registry::DocumentRegistry;
use autoparts_core::{
    Brand, CarModel, Category, CoreError, CoreResult, Customer, Expense, Product, StockEntry, User,
};
use tokio::sync::RwLock;

/// A user account with its password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    /// Argon2 PHC string.
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Vec<UserRecord>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub car_models: Vec<CarModel>,
    pub products: Vec<Product>,
    pub stock_entries: Vec<StockEntry>,
    pub documents: DocumentRegistry,
    pub customers: Vec<Customer>,
    pub expenses: Vec<Expense>,
}

pub type SharedTables = Arc<RwLock<Tables>>;

impl Tables {
    pub fn catalog_refs(&self) -> CatalogRefs<'_> {
        CatalogRefs {
            categories: &self.categories,
            brands: &self.brands,
            car_models: &self.car_models,
        }
    }

    pub fn product(&self, id: &str) -> CoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    pub fn product_mut(&mut self, id: &str) -> CoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    pub fn customer(&self, id: &str) -> CoreResult<&Customer> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))
    }

    pub fn customer_mut(&mut self, id: &str) -> CoreResult<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))
    }
}
