//! # Report Repository
//!
//! Read-only figures computed from the current tables: dashboard, sales
//! analytics and monthly profit. Nothing here is cached; every call reflects
//! the latest sale.

use autoparts_core::analytics::{dashboard, sales_analytics, DashboardStats, SalesAnalytics};
use autoparts_core::finance::{finance_summary, FinanceSummary};

use crate::tables::SharedTables;

#[derive(Debug, Clone)]
pub struct ReportRepository {
    tables: SharedTables,
}

impl ReportRepository {
    pub fn new(tables: SharedTables) -> Self {
        ReportRepository { tables }
    }

    /// Dashboard figures; parts at or below `low_stock_threshold` are listed.
    pub async fn dashboard(&self, low_stock_threshold: i64) -> DashboardStats {
        let tables = self.tables.read().await;
        dashboard(
            tables.documents.all(),
            &tables.products,
            tables.customers.len(),
            low_stock_threshold,
        )
    }

    pub async fn sales_analytics(&self, year: i32) -> SalesAnalytics {
        let tables = self.tables.read().await;
        sales_analytics(tables.documents.all(), &tables.products, &tables.brands, year)
    }

    pub async fn finance_summary(&self, year: i32) -> FinanceSummary {
        let tables = self.tables.read().await;
        finance_summary(tables.documents.all(), &tables.expenses, year)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
