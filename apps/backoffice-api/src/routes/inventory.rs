//! # Inventory Routes
//!
//! Manual stock movements and the stock screen figures. Sale consumption is
//! recorded by checkout and proforma conversion, never here.

use autoparts_core::stock::{InventorySummary, StockThresholds};
use autoparts_core::{Product, StockEntry};
use autoparts_db::StockEntryRequest;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use super::{stamp, SearchQuery};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecordedMovement {
    pub entry: StockEntry,
    /// The product with its new stock level.
    pub product: Product,
}

/// `GET /inventory/entries?search`, newest first.
pub async fn list_entries(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<StockEntry>>> {
    Ok(Json(
        state.db.inventory().entries(query.search.as_deref()).await?,
    ))
}

/// `POST /inventory/entries`
pub async fn record_entry(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<StockEntryRequest>,
) -> ApiResult<Json<RecordedMovement>> {
    let (entry, product) = state.db.inventory().record(request, &stamp(&user)).await?;
    Ok(Json(RecordedMovement { entry, product }))
}

pub async fn summary(_user: AuthUser, State(state): State<AppState>) -> Json<InventorySummary> {
    Json(state.db.inventory().summary(StockThresholds::default()).await)
}
