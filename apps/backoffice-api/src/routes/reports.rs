//! # Report Routes
//!
//! Dashboard for every role; analytics, expenses and finance for admins.

use autoparts_core::analytics::{DashboardStats, SalesAnalytics};
use autoparts_core::finance::{ExpenseDraft, ExpenseFilter, FinanceSummary};
use autoparts_core::Expense;
use axum::extract::{Query, State};
use axum::Json;

use super::{today, YearQuery};
use crate::auth::{AuthUser, RequireAdmin};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn dashboard(_user: AuthUser, State(state): State<AppState>) -> Json<DashboardStats> {
    Json(
        state
            .db
            .reports()
            .dashboard(state.config.low_stock_threshold)
            .await,
    )
}

/// `GET /analytics?year`
pub async fn analytics(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Json<SalesAnalytics> {
    Json(state.db.reports().sales_analytics(query.resolve()).await)
}

/// `GET /expenses?search&category`, newest first.
pub async fn list_expenses(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<ExpenseFilter>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.db.expenses().list(filter).await?))
}

pub async fn create_expense(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(draft): Json<ExpenseDraft>,
) -> ApiResult<Json<Expense>> {
    Ok(Json(state.db.expenses().create(draft, today()).await?))
}

/// `GET /finance/summary?year`
pub async fn finance_summary(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Json<FinanceSummary> {
    Json(state.db.reports().finance_summary(query.resolve()).await)
}
