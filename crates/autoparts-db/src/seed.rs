//! # Seed Data
//!
//! Fixed fixtures loaded into the tables on every start.
//!
//! ## Contents
//! - 2 demo accounts (admin, seller), password `password`
//! - 6 categories, 5 brands, 5 car models
//! - 5 products with 5 purchase stock entries
//! - 2 paid sales (`INV-001`, `INV-002`) and 1 open proforma (`PRO-001`)
//! - 3 customers, 5 expenses
//!
//! The fixture file lists growing tables newest first, the order the
//! repositories keep them in. Seeded invoice totals are historical snapshots
//! and are loaded as-is.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use autoparts_core::registry::DocumentRegistry;
use autoparts_core::{
    Brand, CarModel, Category, Customer, Expense, Invoice, Product, StockEntry, User, VAT_RATE,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::tables::{Tables, UserRecord};

const FIXTURES: &str = include_str!("../fixtures/seed.json");

/// Password of both demo accounts.
pub const DEMO_PASSWORD: &str = "password";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixtures {
    users: Vec<User>,
    categories: Vec<Category>,
    brands: Vec<Brand>,
    car_models: Vec<CarModel>,
    products: Vec<Product>,
    stock_entries: Vec<StockEntry>,
    invoices: Vec<Invoice>,
    customers: Vec<Customer>,
    expenses: Vec<Expense>,
}

/// Builds fresh tables from the fixtures.
pub fn seed_tables() -> DbResult<Tables> {
    let fixtures: Fixtures = serde_json::from_str(FIXTURES)?;
    let password_hash = demo_password_hash()?;

    let users = fixtures
        .users
        .into_iter()
        .map(|user| UserRecord {
            user,
            password_hash: password_hash.clone(),
        })
        .collect();

    // Selling prices always come from the pricing rules.
    let mut products = fixtures.products;
    for product in &mut products {
        product.reprice(VAT_RATE);
    }

    let documents = DocumentRegistry::from_documents(fixtures.invoices)?;

    let tables = Tables {
        users,
        categories: fixtures.categories,
        brands: fixtures.brands,
        car_models: fixtures.car_models,
        products,
        stock_entries: fixtures.stock_entries,
        documents,
        customers: fixtures.customers,
        expenses: fixtures.expenses,
    };

    info!(
        products = tables.products.len(),
        documents = tables.documents.all().len(),
        customers = tables.customers.len(),
        "Seeded business tables"
    );
    Ok(tables)
}

/// Hash of [`DEMO_PASSWORD`], computed once per process.
fn demo_password_hash() -> DbResult<String> {
    static HASH: OnceLock<String> = OnceLock::new();

    if let Some(hash) = HASH.get() {
        return Ok(hash.clone());
    }
    debug!("Hashing demo password");
    let hash = hash_password(DEMO_PASSWORD)?;
    Ok(HASH.get_or_init(|| hash).clone())
}

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Checks a password against its stored hash. An unreadable hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
