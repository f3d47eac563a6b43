//! # Inventory Repository
//!
//! The stock ledger: manual movements, the entry list and stock figures.
//!
//! ## Movement Flow
//! ```text
//! POST stock entry { productId, quantity, direction, purchasePrice? }
//!      │
//!      ▼
//! write guard ──► stock::apply_entry(product) ──► Err: nothing changed
//!      │                    │
//!      │                    ▼
//!      │            entry prepended to the ledger
//!      ▼
//! (entry, product after the movement)
//! ```

use autoparts_core::catalog::product_name;
use autoparts_core::stock::{
    apply_entry, summarize, EntryStamp, InventorySummary, StockMovement, StockThresholds,
};
use autoparts_core::validation::validate_search_query;
use autoparts_core::{Money, Product, StockDirection, StockEntry, StockReason, ValidationError};
use serde::Deserialize;
use tracing::info;

use crate::error::DbResult;
use crate::tables::SharedTables;

/// A manual stock movement.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntryRequest {
    pub product_id: String,
    pub quantity: i64,
    /// Unit cost; the product's purchase price when absent.
    #[serde(default)]
    pub purchase_price: Option<Money>,
    #[serde(default = "default_direction")]
    pub direction: StockDirection,
    /// Defaults to `purchase` for stock-in and `adjustment` for stock-out.
    #[serde(default)]
    pub reason: Option<StockReason>,
    #[serde(default)]
    pub reference: Option<String>,
}

fn default_direction() -> StockDirection {
    StockDirection::In
}

impl StockEntryRequest {
    fn into_movement(self) -> Result<(String, StockMovement), ValidationError> {
        let reason = match (self.reason, self.direction) {
            (Some(StockReason::Sale), _) => {
                return Err(ValidationError::InvalidFormat {
                    field: "reason".to_string(),
                    reason: "sale movements are recorded by checkout".to_string(),
                })
            }
            (Some(reason), _) => reason,
            (None, StockDirection::In) => StockReason::Purchase,
            (None, StockDirection::Out) => StockReason::Adjustment,
        };
        if let Some(price) = self.purchase_price {
            autoparts_core::validation::validate_price("purchase price", price)?;
        }

        let movement = StockMovement {
            quantity: self.quantity,
            direction: self.direction,
            reason,
            purchase_price: self.purchase_price,
            reference: self
                .reference
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        };
        Ok((self.product_id, movement))
    }
}

#[derive(Debug, Clone)]
pub struct InventoryRepository {
    tables: SharedTables,
}

impl InventoryRepository {
    pub fn new(tables: SharedTables) -> Self {
        InventoryRepository { tables }
    }

    /// Ledger entries, newest first, optionally filtered by product name.
    pub async fn entries(&self, search: Option<&str>) -> DbResult<Vec<StockEntry>> {
        let needle = match search {
            Some(search) => validate_search_query(search)?.to_lowercase(),
            None => String::new(),
        };
        let tables = self.tables.read().await;
        Ok(tables
            .stock_entries
            .iter()
            .filter(|entry| {
                needle.is_empty()
                    || product_name(&tables.products, &entry.product_id)
                        .to_lowercase()
                        .contains(&needle)
            })
            .cloned()
            .collect())
    }

    /// Applies a manual movement. Stock-out beyond the available stock is
    /// rejected and nothing is recorded.
    pub async fn record(
        &self,
        request: StockEntryRequest,
        stamp: &EntryStamp,
    ) -> DbResult<(StockEntry, Product)> {
        let (product_id, movement) = request.into_movement()?;

        let mut tables = self.tables.write().await;
        let product = tables.product_mut(&product_id)?;
        let entry = apply_entry(product, movement, stamp)?;
        let product = product.clone();

        info!(
            product_id = %product.id,
            direction = ?entry.direction,
            quantity = entry.quantity,
            stock = product.stock,
            "Stock movement recorded"
        );
        tables.stock_entries.insert(0, entry.clone());
        Ok((entry, product))
    }

    pub async fn summary(&self, thresholds: StockThresholds) -> InventorySummary {
        let tables = self.tables.read().await;
        summarize(&tables.products, thresholds)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
