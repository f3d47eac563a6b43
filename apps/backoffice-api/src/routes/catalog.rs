//! # Catalog Routes
//!
//! Products and the read-only reference tables. Selling prices are always
//! derived server-side from purchase price and margin.

use autoparts_core::catalog::{ProductDraft, ProductFilter};
use autoparts_core::{Brand, CarModel, Category, Product};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::debug;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn categories(_user: AuthUser, State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.db.products().categories().await)
}

pub async fn brands(_user: AuthUser, State(state): State<AppState>) -> Json<Vec<Brand>> {
    Json(state.db.products().brands().await)
}

pub async fn car_models(_user: AuthUser, State(state): State<AppState>) -> Json<Vec<CarModel>> {
    Json(state.db.products().car_models().await)
}

/// `GET /products?search&categoryId&brandId&inStockOnly`
pub async fn list_products(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    debug!(?filter, "list_products");
    Ok(Json(state.db.products().list(filter).await?))
}

pub async fn get_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.db.products().get(&id).await?))
}

pub async fn create_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.db.products().create(draft).await?))
}

pub async fn update_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.db.products().update(&id, draft).await?))
}

pub async fn delete_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.db.products().delete(&id).await?))
}
