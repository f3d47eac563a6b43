//! # Cart Routes
//!
//! The point-of-sale cart of the signed-in user.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  INV-xxxx│       │
//! │  │  Cart    │     │          │     │          │     │  (paid)  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add item          stock check, loyalty,              │
//! │                   change qty        registry insert (atomic)           │
//! │                   remove item            │                              │
//! │                   set customer           ▼                              │
//! │                        │           cart cleared on success,            │
//! │                        ▼           kept unchanged on failure           │
//! │                   DELETE /cart ─────────────────────►                  │
//! │                                                  (back to empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use autoparts_core::document::{DocumentDraft, DocumentTotals, LinePricing};
use autoparts_core::{Invoice, InvoiceItem, PaymentMethod, VAT_RATE};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stamp;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<InvoiceItem>,
    pub customer_id: Option<String>,
    pub totals: DocumentTotals,
}

impl From<&DocumentDraft> for CartView {
    fn from(cart: &DocumentDraft) -> Self {
        CartView {
            items: cart.items().to_vec(),
            customer_id: cart.customer_id().map(str::to_string),
            totals: cart.totals(VAT_RATE),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Sell at the TTC price (POS default) or the HT price.
    #[serde(default = "default_tax_included")]
    pub tax_included: bool,
}

fn default_quantity() -> i64 {
    1
}

fn default_tax_included() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ChangeQuantityRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCustomerRequest {
    pub customer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
}

pub async fn get_cart(user: AuthUser, State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(&state.carts.snapshot(&user.id).await))
}

pub async fn clear_cart(user: AuthUser, State(state): State<AppState>) -> ApiResult<Json<CartView>> {
    let ((), cart) = state
        .carts
        .update(&user.id, |cart| {
            cart.clear();
            Ok(())
        })
        .await?;
    Ok(Json(CartView::from(&cart)))
}

/// `POST /cart/items`: adds units, merging with an existing line for the
/// same product and pricing.
pub async fn add_item(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<Json<CartView>> {
    debug!(product_id = %request.product_id, quantity = request.quantity, "add_item");
    let product = state.db.products().get(&request.product_id).await?;
    let pricing = LinePricing::from_tax_included(request.tax_included);

    let ((), cart) = state
        .carts
        .update(&user.id, |cart| {
            cart.add_line(&product, request.quantity, pricing)?;
            Ok(())
        })
        .await?;
    Ok(Json(CartView::from(&cart)))
}

/// `PATCH /cart/items/{lineId}`: quantity never drops below 1.
pub async fn change_item(
    user: AuthUser,
    State(state): State<AppState>,
    Path(line_id): Path<String>,
    Json(request): Json<ChangeQuantityRequest>,
) -> ApiResult<Json<CartView>> {
    let ((), cart) = state
        .carts
        .update(&user.id, |cart| {
            cart.change_quantity(&line_id, request.delta)?;
            Ok(())
        })
        .await?;
    Ok(Json(CartView::from(&cart)))
}

pub async fn remove_item(
    user: AuthUser,
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> ApiResult<Json<CartView>> {
    let ((), cart) = state
        .carts
        .update(&user.id, |cart| {
            cart.remove_line(&line_id)?;
            Ok(())
        })
        .await?;
    Ok(Json(CartView::from(&cart)))
}

/// `PUT /cart/customer`: `null` makes it a walk-in sale.
pub async fn set_customer(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<SetCustomerRequest>,
) -> ApiResult<Json<CartView>> {
    if let Some(customer_id) = &request.customer_id {
        state.db.customers().get(customer_id).await?;
    }

    let ((), cart) = state
        .carts
        .update(&user.id, |cart| {
            cart.set_customer(request.customer_id);
            Ok(())
        })
        .await?;
    Ok(Json(CartView::from(&cart)))
}

/// `POST /cart/checkout`: the cart becomes a paid sale invoice.
pub async fn checkout(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> ApiResult<Json<Invoice>> {
    let mut carts = state.carts.lock().await;
    let cart = carts.entry(user.id.clone()).or_default();

    let invoice = state
        .db
        .invoices()
        .checkout(cart, request.payment_method, &stamp(&user))
        .await?;
    Ok(Json(invoice))
}
