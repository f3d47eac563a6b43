//! # Product Repository
//!
//! Catalog CRUD plus the read-only reference tables (categories, brands,
//! car models).
//!
//! ## Key Operations
//! - Filtered listing (name/barcode search, category, brand, in-stock)
//! - Create/update with derived selling prices
//! - Barcode uniqueness
//!
//! Stock is set once at creation. Afterwards it only moves through the
//! stock ledger ([`InventoryRepository`](super::InventoryRepository)) and
//! checkout.

use autoparts_core::catalog::{ProductDraft, ProductFilter};
use autoparts_core::{
    Brand, CarModel, Category, CoreError, CoreResult, Product, ValidationError, VAT_RATE,
};
use tracing::{debug, info};

use super::generate_id;
use crate::error::DbResult;
use crate::tables::{SharedTables, Tables};

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let batteries = repo.list(ProductFilter { search: Some("batterie".into()), ..Default::default() }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    tables: SharedTables,
}

impl ProductRepository {
    pub fn new(tables: SharedTables) -> Self {
        ProductRepository { tables }
    }

    /// Lists products matching `filter`, in catalog order.
    pub async fn list(&self, filter: ProductFilter) -> DbResult<Vec<Product>> {
        let filter = filter.validated()?;
        let tables = self.tables.read().await;
        Ok(filter.apply(&tables.products).into_iter().cloned().collect())
    }

    pub async fn get(&self, id: &str) -> DbResult<Product> {
        let tables = self.tables.read().await;
        Ok(tables.product(id)?.clone())
    }

    /// Creates a product with a fresh id and derived prices.
    pub async fn create(&self, draft: ProductDraft) -> DbResult<Product> {
        let mut tables = self.tables.write().await;
        let draft = draft.validate(tables.catalog_refs())?;
        ensure_unique_barcode(&tables, &draft.barcode, None)?;

        let product = draft.into_product(generate_id(), VAT_RATE);
        info!(
            id = %product.id,
            name = %product.name,
            price = %product.selling_price_with_tax,
            "Product created"
        );
        tables.products.push(product.clone());
        Ok(product)
    }

    /// Overwrites the editable fields and re-derives prices. Stock is kept.
    pub async fn update(&self, id: &str, draft: ProductDraft) -> DbResult<Product> {
        let mut tables = self.tables.write().await;
        tables.product(id)?;
        let draft = draft.validate(tables.catalog_refs())?;
        ensure_unique_barcode(&tables, &draft.barcode, Some(id))?;

        let product = tables.product_mut(id)?;
        draft.apply_to(product, VAT_RATE);
        debug!(id = %id, "Product updated");
        Ok(product.clone())
    }

    /// Removes a product. Documents keep their line snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<Product> {
        let mut tables = self.tables.write().await;
        let index = tables
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        let removed = tables.products.remove(index);
        info!(id = %id, name = %removed.name, "Product deleted");
        Ok(removed)
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.tables.read().await.categories.clone()
    }

    pub async fn brands(&self) -> Vec<Brand> {
        self.tables.read().await.brands.clone()
    }

    pub async fn car_models(&self) -> Vec<CarModel> {
        self.tables.read().await.car_models.clone()
    }

    pub async fn count(&self) -> usize {
        self.tables.read().await.products.len()
    }
}

/// A non-empty barcode may belong to one product only.
fn ensure_unique_barcode(tables: &Tables, barcode: &str, except_id: Option<&str>) -> CoreResult<()> {
    if barcode.is_empty() {
        return Ok(());
    }
    let taken = tables
        .products
        .iter()
        .any(|p| p.barcode == barcode && Some(p.id.as_str()) != except_id);
    if taken {
        return Err(ValidationError::Duplicate {
            field: "barcode".to_string(),
            value: barcode.to_string(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::seeded;
    use crate::DbError;
    use autoparts_core::Money;

    fn draft(barcode: &str) -> ProductDraft {
        ProductDraft {
            name: "Disque de frein Delphi".to_string(),
            barcode: barcode.to_string(),
            category_id: "3".to_string(),
            brand_id: "5".to_string(),
            compatible_cars: vec!["4".to_string(), "5".to_string()],
            purchase_price: Money::from_xof(20_000),
            margin_bps: 3_000,
            stock: 8,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_derives_prices() {
        let db = seeded().await;
        let product = db.products().create(draft("5012345678900")).await.unwrap();

        assert_eq!(product.selling_price_excluding_tax.xof(), 26_000);
        assert_eq!(product.selling_price_with_tax.xof(), 30_680);
        assert_eq!(db.products().count().await, 6);
        assert_eq!(db.products().get(&product.id).await.unwrap(), product);
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = seeded().await;
        let err = db.products().create(draft("4007954321098")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));

        // A product may keep its own barcode on update.
        let mut own = draft("4007954321098");
        own.name = "Batterie Bosch S4 (70Ah)".to_string();
        let updated = db.products().update("2", own).await.unwrap();
        assert_eq!(updated.name, "Batterie Bosch S4 (70Ah)");
    }

    #[tokio::test]
    async fn test_update_keeps_stock() {
        let db = seeded().await;
        let mut change = draft("");
        change.stock = 0;
        let updated = db.products().update("1", change).await.unwrap();

        assert_eq!(updated.stock, 42);
        assert_eq!(updated.selling_price_with_tax.xof(), 30_680);
    }

    #[tokio::test]
    async fn test_filter_and_unknown_ids() {
        let db = seeded().await;
        let bosch = db
            .products()
            .list(ProductFilter {
                brand_id: Some("1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(bosch.len(), 2);

        let by_barcode = db
            .products()
            .list(ProductFilter {
                search: Some("3305678".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_barcode[0].id, "4");

        assert!(matches!(
            db.products().get("missing").await,
            Err(DbError::Core(CoreError::ProductNotFound(_)))
        ));
        assert!(db.products().delete("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_keeps_document_snapshots() {
        let db = seeded().await;
        db.products().delete("2").await.unwrap();

        let invoice = db.invoices().get("INV-002").await.unwrap();
        assert_eq!(invoice.items[0].product_name, "Batterie Bosch S4");
    }

    #[tokio::test]
    async fn test_reference_tables() {
        let db = seeded().await;
        let repo = db.products();
        assert_eq!(repo.categories().await.len(), 6);
        assert_eq!(repo.brands().await[4].name, "Delphi");
        assert_eq!(repo.car_models().await[0].years.len(), 3);
    }
}
