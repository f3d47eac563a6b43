//! # Invoice Routes
//!
//! Sale invoices and proformas.
//!
//! ```text
//! POST /proformas ──► PRO-xxxx (unpaid, stock untouched)
//!                          │
//!                          ▼
//! POST /proformas/{id}/convert ──► INV-xxxx (unpaid, stock consumed,
//!                                  loyalty credited, linked both ways)
//!                          │
//!                          ▼
//! POST /invoices/{id}/mark-paid ──► paid (idempotent)
//! ```

use autoparts_core::registry::DocumentFilter;
use autoparts_core::Invoice;
use autoparts_db::ProformaRequest;
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::debug;

use super::stamp;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /invoices?documentType&paid&search`, newest first.
pub async fn list_invoices(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<DocumentFilter>,
) -> ApiResult<Json<Vec<Invoice>>> {
    debug!(?filter, "list_invoices");
    Ok(Json(state.db.invoices().list(filter).await?))
}

pub async fn get_invoice(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.db.invoices().get(&id).await?))
}

pub async fn mark_paid(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.db.invoices().mark_paid(&id).await?))
}

pub async fn create_proforma(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<ProformaRequest>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(
        state
            .db
            .invoices()
            .create_proforma(request, &stamp(&user))
            .await?,
    ))
}

/// `POST /proformas/{id}/convert`: returns the new sale invoice.
pub async fn convert_proforma(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(
        state
            .db
            .invoices()
            .convert_proforma(&id, &stamp(&user))
            .await?,
    ))
}
