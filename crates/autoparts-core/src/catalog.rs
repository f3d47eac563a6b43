//! # Catalog
//!
//! Product create/update payloads, the product list filter and id → name
//! resolution for reference data.
//!
//! Lookups never fail: a dangling id resolves to a placeholder name so old
//! documents still render after a product, brand or category is removed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Brand, CarModel, Category, Product, TaxRate};
use crate::validation::{
    validate_barcode, validate_margin_bps, validate_price, validate_product_name,
    validate_search_query, validate_stock_level,
};

pub const UNKNOWN_PRODUCT: &str = "Unknown product";
pub const UNKNOWN_CATEGORY: &str = "Unknown category";
pub const UNKNOWN_BRAND: &str = "Unknown brand";

// =============================================================================
// Product Draft
// =============================================================================

/// Product form payload.
///
/// Selling prices are never accepted from the client; they are derived.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub barcode: String,
    pub category_id: String,
    pub brand_id: String,
    #[serde(default)]
    pub compatible_cars: Vec<String>,
    pub purchase_price: Money,
    pub margin_bps: u32,
    /// Initial stock on creation; ignored on update (stock moves through
    /// the ledger).
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image: Option<String>,
}

/// Reference tables a product draft is checked against.
#[derive(Debug, Clone, Copy)]
pub struct CatalogRefs<'a> {
    pub categories: &'a [Category],
    pub brands: &'a [Brand],
    pub car_models: &'a [CarModel],
}

impl ProductDraft {
    /// Validates fields and references, returning a normalized copy.
    pub fn validate(self, refs: CatalogRefs<'_>) -> CoreResult<ProductDraft> {
        let name = validate_product_name(&self.name)?;
        let barcode = validate_barcode(&self.barcode)?;
        validate_price("purchase price", self.purchase_price)?;
        validate_margin_bps(self.margin_bps)?;
        validate_stock_level(self.stock)?;

        if !refs.categories.iter().any(|c| c.id == self.category_id) {
            return Err(unknown_reference("categoryId", &self.category_id).into());
        }
        if !refs.brands.iter().any(|b| b.id == self.brand_id) {
            return Err(unknown_reference("brandId", &self.brand_id).into());
        }
        if let Some(car) = self
            .compatible_cars
            .iter()
            .find(|car| !refs.car_models.iter().any(|m| &m.id == *car))
        {
            return Err(unknown_reference("compatibleCars", car).into());
        }

        let mut compatible_cars: Vec<String> = Vec::with_capacity(self.compatible_cars.len());
        for car in self.compatible_cars {
            if !compatible_cars.contains(&car) {
                compatible_cars.push(car);
            }
        }

        Ok(ProductDraft {
            name,
            barcode,
            compatible_cars,
            image: self.image.filter(|url| !url.trim().is_empty()),
            ..self
        })
    }

    /// Builds a new product with derived prices.
    pub fn into_product(self, id: String, rate: TaxRate) -> Product {
        let mut product = Product {
            id,
            name: self.name,
            barcode: self.barcode,
            category_id: self.category_id,
            brand_id: self.brand_id,
            compatible_cars: self.compatible_cars,
            purchase_price: self.purchase_price,
            margin_bps: self.margin_bps,
            selling_price_excluding_tax: Money::zero(),
            selling_price_with_tax: Money::zero(),
            stock: self.stock,
            image: self.image,
        };
        product.reprice(rate);
        product
    }

    /// Overwrites the editable fields of `product` and re-derives prices.
    pub fn apply_to(self, product: &mut Product, rate: TaxRate) {
        product.name = self.name;
        product.barcode = self.barcode;
        product.category_id = self.category_id;
        product.brand_id = self.brand_id;
        product.compatible_cars = self.compatible_cars;
        product.purchase_price = self.purchase_price;
        product.margin_bps = self.margin_bps;
        product.image = self.image;
        product.reprice(rate);
    }
}

fn unknown_reference(field: &str, id: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("unknown id '{id}'"),
    }
}

// =============================================================================
// Product Filter
// =============================================================================

/// Product list query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Name (case-insensitive) or barcode substring.
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<String>,
    /// POS picker: hide parts with no stock.
    #[serde(default)]
    pub in_stock_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = product.matches_search(self.search.as_deref().unwrap_or("").trim());
        let category_ok = self
            .category_id
            .as_deref()
            .map_or(true, |id| product.category_id == id);
        let brand_ok = self
            .brand_id
            .as_deref()
            .map_or(true, |id| product.brand_id == id);
        let stock_ok = !self.in_stock_only || product.stock > 0;
        search_ok && category_ok && brand_ok && stock_ok
    }

    /// Normalizes the search text, rejecting overlong queries.
    pub fn validated(mut self) -> CoreResult<Self> {
        if let Some(search) = self.search.take() {
            self.search = Some(validate_search_query(&search)?);
        }
        Ok(self)
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

// =============================================================================
// Name Resolution
// =============================================================================

pub fn product_name<'a>(products: &'a [Product], id: &str) -> &'a str {
    products
        .iter()
        .find(|p| p.id == id)
        .map_or(UNKNOWN_PRODUCT, |p| p.name.as_str())
}

pub fn category_name<'a>(categories: &'a [Category], id: &str) -> &'a str {
    categories
        .iter()
        .find(|c| c.id == id)
        .map_or(UNKNOWN_CATEGORY, |c| c.name.as_str())
}

pub fn brand_name<'a>(brands: &'a [Brand], id: &str) -> &'a str {
    brands
        .iter()
        .find(|b| b.id == id)
        .map_or(UNKNOWN_BRAND, |b| b.name.as_str())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoreError, VAT_RATE};

    fn categories() -> Vec<Category> {
        vec![Category {
            id: "4".to_string(),
            name: "Batteries".to_string(),
        }]
    }

    fn brands() -> Vec<Brand> {
        vec![Brand {
            id: "1".to_string(),
            name: "Bosch".to_string(),
            logo: None,
        }]
    }

    fn car_models() -> Vec<CarModel> {
        vec![CarModel {
            id: "1".to_string(),
            brand: "Toyota".to_string(),
            name: "Corolla".to_string(),
            years: vec!["2018-2023".to_string()],
        }]
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            name: " Batterie Bosch S4 ".to_string(),
            barcode: "4007954321098".to_string(),
            category_id: "4".to_string(),
            brand_id: "1".to_string(),
            compatible_cars: vec!["1".to_string()],
            purchase_price: Money::from_xof(45_000),
            margin_bps: 2_500,
            stock: 15,
            image: Some("  ".to_string()),
        }
    }

    fn with_refs<T>(f: impl FnOnce(CatalogRefs<'_>) -> T) -> T {
        let (c, b, m) = (categories(), brands(), car_models());
        f(CatalogRefs {
            categories: &c,
            brands: &b,
            car_models: &m,
        })
    }

    #[test]
    fn test_draft_derives_prices() {
        let product = with_refs(|refs| draft().validate(refs))
            .unwrap()
            .into_product("p-1".to_string(), VAT_RATE);

        assert_eq!(product.name, "Batterie Bosch S4");
        assert_eq!(product.selling_price_excluding_tax.xof(), 56_250);
        assert_eq!(product.selling_price_with_tax.xof(), 66_375);
        assert_eq!(product.stock, 15);
        assert!(product.image.is_none());
    }

    #[test]
    fn test_draft_rejects_unknown_references() {
        let mut bad = draft();
        bad.brand_id = "9".to_string();
        let err = with_refs(|refs| bad.validate(refs)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidFormat { ref field, .. }) if field == "brandId"));

        let mut bad = draft();
        bad.compatible_cars.push("42".to_string());
        assert!(with_refs(|refs| bad.validate(refs)).is_err());
    }

    #[test]
    fn test_draft_rejects_bad_fields() {
        let mut bad = draft();
        bad.name = String::new();
        assert!(with_refs(|refs| bad.validate(refs)).is_err());

        let mut bad = draft();
        bad.purchase_price = Money::from_xof(-5);
        assert!(with_refs(|refs| bad.validate(refs)).is_err());

        let mut bad = draft();
        bad.stock = -1;
        assert!(with_refs(|refs| bad.validate(refs)).is_err());

        let mut bad = draft();
        bad.purchase_price = Money::from_xof(i64::MAX / 4);
        assert!(with_refs(|refs| bad.validate(refs)).is_err());
    }

    #[test]
    fn test_most_expensive_product_fits_a_full_line() {
        use crate::document::{DocumentDraft, LinePricing};
        use crate::validation::MAX_MARGIN_BPS;
        use crate::{MAX_AMOUNT_XOF, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE_XOF};

        let mut top = draft();
        top.purchase_price = Money::from_xof(MAX_AMOUNT_XOF);
        top.margin_bps = MAX_MARGIN_BPS;
        let product = with_refs(|refs| top.validate(refs))
            .unwrap()
            .into_product("p-top".to_string(), VAT_RATE);
        assert!(product.selling_price_with_tax.xof() <= MAX_UNIT_PRICE_XOF);

        let mut cart = DocumentDraft::new();
        let line = cart
            .add_line(&product, MAX_ITEM_QUANTITY, LinePricing::TaxIncluded)
            .unwrap();
        assert_eq!(
            line.total.xof(),
            product.selling_price_with_tax.xof() * MAX_ITEM_QUANTITY
        );
    }

    #[test]
    fn test_update_keeps_stock_and_reprices() {
        let mut product = with_refs(|refs| draft().validate(refs))
            .unwrap()
            .into_product("p-1".to_string(), VAT_RATE);

        let mut update = draft();
        update.purchase_price = Money::from_xof(50_000);
        update.stock = 999;
        update.apply_to(&mut product, VAT_RATE);

        assert_eq!(product.stock, 15);
        assert_eq!(product.selling_price_excluding_tax.xof(), 62_500);
        assert_eq!(product.selling_price_with_tax.xof(), 73_750);
    }

    #[test]
    fn test_product_filter() {
        let mut empty = with_refs(|refs| draft().validate(refs))
            .unwrap()
            .into_product("a".to_string(), VAT_RATE);
        empty.stock = 0;
        let full = with_refs(|refs| draft().validate(refs))
            .unwrap()
            .into_product("b".to_string(), VAT_RATE);
        let products = vec![empty, full];

        let all = ProductFilter::default().apply(&products);
        assert_eq!(all.len(), 2);

        let pos = ProductFilter {
            search: Some("BATTERIE".to_string()),
            in_stock_only: true,
            ..Default::default()
        };
        let picked = pos.apply(&products);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, "b");

        let other_brand = ProductFilter {
            brand_id: Some("2".to_string()),
            ..Default::default()
        };
        assert!(other_brand.apply(&products).is_empty());
    }

    #[test]
    fn test_name_resolution_placeholders() {
        assert_eq!(category_name(&categories(), "4"), "Batteries");
        assert_eq!(category_name(&categories(), "x"), UNKNOWN_CATEGORY);
        assert_eq!(brand_name(&brands(), "x"), UNKNOWN_BRAND);
        assert_eq!(product_name(&[], "1"), UNKNOWN_PRODUCT);
    }
}
