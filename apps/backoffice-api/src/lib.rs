//! # Backoffice API
//!
//! HTTP JSON service for the auto-parts back-office.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Backoffice API Routes                           │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Session       │  │  Catalog/Stock │  │  Point of Sale             ││
//! │  │                │  │                │  │                            ││
//! │  │ • login/logout │  │ • products     │  │ • cart lines, customer     ││
//! │  │ • session      │  │ • ref tables   │  │ • checkout                 ││
//! │  │ • company (A)  │  │ • movements    │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Documents     │  │  Customers     │  │  Reports                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • invoices     │  │ • CRUD         │  │ • dashboard                ││
//! │  │ • proformas    │  │                │  │ • analytics (A)            ││
//! │  │ • conversion   │  │                │  │ • expenses, finance (A)    ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  (A) = admin role required. Everything but /health and /auth/login     │
//! │  needs a bearer token.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables, see [`config::ApiConfig`]:
//! - `BACKOFFICE_PORT` - HTTP port (default: 8080)
//! - `BACKOFFICE_DB_PATH` - SQLite file for session blobs, or `:memory:`
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_ACCESS_LIFETIME_SECS` - Access token lifetime (default: 3600)
//! - `LOW_STOCK_THRESHOLD` - Dashboard alert threshold (default: 20)
//! - `CORS_ALLOW_ORIGIN` - Allowed browser origin (default: any)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::routes::{cart, catalog, customers, health, inventory, invoices, reports, session};

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Build the axum router (separated from `main` for testing).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Session
        .route("/auth/login", post(session::login))
        .route("/auth/logout", post(session::logout))
        .route("/session", get(session::session))
        .route(
            "/company-profile",
            get(session::company_profile).put(session::update_company_profile),
        )
        // Catalog
        .route("/categories", get(catalog::categories))
        .route("/brands", get(catalog::brands))
        .route("/car-models", get(catalog::car_models))
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        // Inventory
        .route(
            "/inventory/entries",
            get(inventory::list_entries).post(inventory::record_entry),
        )
        .route("/inventory/summary", get(inventory::summary))
        // Point of sale
        .route("/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/cart/items", post(cart::add_item))
        .route(
            "/cart/items/{line_id}",
            patch(cart::change_item).delete(cart::remove_item),
        )
        .route("/cart/customer", put(cart::set_customer))
        .route("/cart/checkout", post(cart::checkout))
        // Documents
        .route("/invoices", get(invoices::list_invoices))
        .route("/invoices/{id}", get(invoices::get_invoice))
        .route("/invoices/{id}/mark-paid", post(invoices::mark_paid))
        .route("/proformas", post(invoices::create_proforma))
        .route("/proformas/{id}/convert", post(invoices::convert_proforma))
        // Customers
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        // Reports
        .route("/dashboard", get(reports::dashboard))
        .route("/analytics", get(reports::analytics))
        .route(
            "/expenses",
            get(reports::list_expenses).post(reports::create_expense),
        )
        .route("/finance/summary", get(reports::finance_summary))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(state.config.cors_allow_origin.as_deref()))
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(_)) => {
            warn!("CORS_ALLOW_ORIGIN is not a valid header value, allowing any origin");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}
