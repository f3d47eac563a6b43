//! # Customer Routes
//!
//! Loyalty points and purchase counters are maintained by sales only; the
//! forms never set them.

use autoparts_core::customer::{CustomerDraft, CustomerFilter};
use autoparts_core::Customer;
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /customers?search`
pub async fn list_customers(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.db.customers().list(filter).await?))
}

pub async fn get_customer(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.db.customers().get(&id).await?))
}

pub async fn create_customer(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<CustomerDraft>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.db.customers().create(draft).await?))
}

pub async fn update_customer(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<CustomerDraft>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.db.customers().update(&id, draft).await?))
}

/// Existing invoices keep the id and show "Unknown customer" afterwards.
pub async fn delete_customer(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.db.customers().delete(&id).await?))
}
