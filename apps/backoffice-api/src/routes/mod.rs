//! # Routes Module
//!
//! HTTP handlers, grouped by back-office screen.
//!
//! ## Route Organization
//! ```text
//! routes/
//! ├── health.rs     - Liveness and store health
//! ├── session.rs    - Login, logout, session, company profile
//! ├── catalog.rs    - Products and reference tables
//! ├── inventory.rs  - Stock movements and stock summary
//! ├── cart.rs       - Point-of-sale cart and checkout
//! ├── invoices.rs   - Invoices, proformas, conversion
//! ├── customers.rs  - Customer CRUD
//! └── reports.rs    - Dashboard, analytics, expenses, finance
//! ```
//!
//! ## Handler Pattern
//! ```rust,ignore
//! async fn get_product(
//!     _user: AuthUser,
//!     State(state): State<AppState>,
//!     Path(id): Path<String>,
//! ) -> ApiResult<Json<Product>> {
//!     debug!(id = %id, "get_product");
//!     Ok(Json(state.db.products().get(&id).await?))
//! }
//! ```

pub mod cart;
pub mod catalog;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod reports;
pub mod session;

use autoparts_core::stock::EntryStamp;
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;

use crate::auth::AuthUser;

/// Business date for new records (local calendar day).
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Stamp for movements and documents recorded by `user` today.
pub(crate) fn stamp(user: &AuthUser) -> EntryStamp {
    EntryStamp {
        date: today(),
        created_by: user.id.clone(),
    }
}

/// `?year=` query; defaults to the current year.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

impl YearQuery {
    pub fn resolve(&self) -> i32 {
        self.year.unwrap_or_else(|| today().year())
    }
}

/// `?search=` query.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}
