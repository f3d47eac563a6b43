//! # Analytics
//!
//! Dashboard figures and sales statistics, computed from the live tables.
//! Only sale invoices count as sales; proformas are quotes.

use std::collections::HashMap;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{brand_name, UNKNOWN_PRODUCT};
use crate::money::Money;
use crate::types::{Brand, Invoice, Product};

/// Short month names as shown on the charts.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Juin", "Juil", "Août", "Sep", "Oct", "Nov", "Déc",
];

/// Short weekday names, Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

/// Number of sales listed on the dashboard.
pub const RECENT_SALES_LIMIT: usize = 5;

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sales_amount: Money,
    pub total_sales_count: usize,
    pub low_stock_count: usize,
    pub customers_count: usize,
    /// Products at or below the alert threshold.
    pub low_stock_products: Vec<Product>,
    /// Most recent sales, newest first.
    pub recent_sales: Vec<Invoice>,
}

/// Builds the dashboard from documents ordered newest first.
pub fn dashboard(
    invoices: &[Invoice],
    products: &[Product],
    customers_count: usize,
    low_stock_threshold: i64,
) -> DashboardStats {
    let sales: Vec<&Invoice> = invoices.iter().filter(|i| i.is_sale()).collect();
    let low_stock_products: Vec<Product> = products
        .iter()
        .filter(|p| p.stock <= low_stock_threshold)
        .cloned()
        .collect();

    DashboardStats {
        total_sales_amount: sales.iter().map(|i| i.total).sum(),
        total_sales_count: sales.len(),
        low_stock_count: low_stock_products.len(),
        customers_count,
        low_stock_products,
        recent_sales: sales
            .into_iter()
            .take(RECENT_SALES_LIMIT)
            .cloned()
            .collect(),
    }
}

// =============================================================================
// Sales Statistics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BrandSales {
    pub brand_id: String,
    pub brand: String,
    pub sales: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyAmount {
    /// 1 = January.
    pub month: u32,
    pub label: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyAmount {
    pub day: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub year: i32,
    pub top_products: Vec<TopProduct>,
    pub top_brands: Vec<BrandSales>,
    pub monthly_sales: Vec<MonthlyAmount>,
    pub daily_sales: Vec<DailyAmount>,
}

/// Products by quantity sold, highest first. Ties keep first-sold order.
pub fn top_products(invoices: &[Invoice], products: &[Product], limit: usize) -> Vec<TopProduct> {
    let mut totals: Vec<TopProduct> = Vec::new();
    for item in invoices.iter().filter(|i| i.is_sale()).flat_map(|i| &i.items) {
        match totals.iter_mut().find(|t| t.product_id == item.product_id) {
            Some(entry) => entry.quantity += item.quantity,
            None => totals.push(TopProduct {
                product_id: item.product_id.clone(),
                name: products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| {
                        if item.product_name.is_empty() {
                            UNKNOWN_PRODUCT.to_string()
                        } else {
                            item.product_name.clone()
                        }
                    }),
                quantity: item.quantity,
            }),
        }
    }
    totals.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    totals.truncate(limit);
    totals
}

/// Brands by sales amount (line totals), highest first.
pub fn top_brands(
    invoices: &[Invoice],
    products: &[Product],
    brands: &[Brand],
    limit: usize,
) -> Vec<BrandSales> {
    let brand_of: HashMap<&str, &str> = products
        .iter()
        .map(|p| (p.id.as_str(), p.brand_id.as_str()))
        .collect();

    let mut totals: Vec<BrandSales> = Vec::new();
    for item in invoices.iter().filter(|i| i.is_sale()).flat_map(|i| &i.items) {
        let Some(brand_id) = brand_of.get(item.product_id.as_str()) else {
            continue;
        };
        match totals.iter_mut().find(|t| t.brand_id == *brand_id) {
            Some(entry) => entry.sales += item.total,
            None => totals.push(BrandSales {
                brand_id: brand_id.to_string(),
                brand: brand_name(brands, brand_id).to_string(),
                sales: item.total,
            }),
        }
    }
    totals.sort_by(|a, b| b.sales.cmp(&a.sales));
    totals.truncate(limit);
    totals
}

/// Sales per calendar month of `year`, January first.
pub fn monthly_sales(invoices: &[Invoice], year: i32) -> Vec<MonthlyAmount> {
    let mut months = [Money::zero(); 12];
    for invoice in invoices
        .iter()
        .filter(|i| i.is_sale() && i.date.year() == year)
    {
        months[invoice.date.month0() as usize] += invoice.total;
    }
    months
        .iter()
        .enumerate()
        .map(|(i, amount)| MonthlyAmount {
            month: i as u32 + 1,
            label: MONTH_LABELS[i].to_string(),
            amount: *amount,
        })
        .collect()
}

/// Sales per day of the week over all time, Monday first.
pub fn weekday_sales(invoices: &[Invoice]) -> Vec<DailyAmount> {
    let mut days = [Money::zero(); 7];
    for invoice in invoices.iter().filter(|i| i.is_sale()) {
        let index = invoice.date.weekday().num_days_from_monday() as usize;
        days[index] += invoice.total;
    }
    days.iter()
        .enumerate()
        .map(|(i, amount)| DailyAmount {
            day: WEEKDAY_LABELS[i].to_string(),
            amount: *amount,
        })
        .collect()
}

pub fn sales_analytics(
    invoices: &[Invoice],
    products: &[Product],
    brands: &[Brand],
    year: i32,
) -> SalesAnalytics {
    SalesAnalytics {
        year,
        top_products: top_products(invoices, products, 5),
        top_brands: top_brands(invoices, products, brands, 5),
        monthly_sales: monthly_sales(invoices, year),
        daily_sales: weekday_sales(invoices),
    }
}

/// Label of a weekday as used by [`weekday_sales`].
pub fn weekday_label(day: Weekday) -> &'static str {
    WEEKDAY_LABELS[day.num_days_from_monday() as usize]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentType, InvoiceItem};
    use chrono::NaiveDate;

    fn product(id: &str, brand_id: &str, name: &str, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            barcode: String::new(),
            category_id: "1".to_string(),
            brand_id: brand_id.to_string(),
            compatible_cars: vec![],
            purchase_price: Money::zero(),
            margin_bps: 0,
            selling_price_excluding_tax: Money::zero(),
            selling_price_with_tax: Money::zero(),
            stock,
            image: None,
        }
    }

    fn item(product_id: &str, quantity: i64, total: i64) -> InvoiceItem {
        InvoiceItem {
            id: product_id.to_string(),
            product_id: product_id.to_string(),
            product_name: String::new(),
            quantity,
            unit_price: Money::from_xof(total / quantity),
            total: Money::from_xof(total),
            tax_included: true,
        }
    }

    fn invoice(id: &str, day: u32, document_type: DocumentType, items: Vec<InvoiceItem>) -> Invoice {
        let total = items.iter().map(|i| i.total).sum();
        Invoice {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 10, day).unwrap(),
            customer_id: None,
            items,
            subtotal: Money::zero(),
            tax: Money::zero(),
            total,
            paid: true,
            document_type,
            created_by: "1".to_string(),
            payment_method: None,
            converted_from: None,
            converted_to: None,
        }
    }

    fn fixtures() -> (Vec<Invoice>, Vec<Product>, Vec<Brand>) {
        let invoices = vec![
            invoice(
                "PRO-001",
                27,
                DocumentType::Proforma,
                vec![item("4", 1, 28_674), item("5", 4, 19_824)],
            ),
            invoice("INV-002", 26, DocumentType::Sale, vec![item("2", 1, 66_375)]),
            invoice(
                "INV-001",
                25,
                DocumentType::Sale,
                vec![item("1", 2, 15_340), item("3", 1, 16_992)],
            ),
        ];
        let products = vec![
            product("1", "1", "Filtre à huile Bosch", 42),
            product("2", "1", "Batterie Bosch S4", 15),
            product("3", "3", "Huile moteur Total Quartz 5W40", 30),
            product("4", "4", "Plaquettes de frein Valeo", 22),
            product("5", "2", "Ampoule phare NGK", 50),
        ];
        let brands = ["Bosch", "NGK", "Total", "Valeo", "Delphi"]
            .iter()
            .enumerate()
            .map(|(i, name)| Brand {
                id: (i + 1).to_string(),
                name: name.to_string(),
                logo: None,
            })
            .collect();
        (invoices, products, brands)
    }

    #[test]
    fn test_dashboard_counts_sales_only() {
        let (invoices, products, _) = fixtures();
        let stats = dashboard(&invoices, &products, 3, 20);

        assert_eq!(stats.total_sales_amount.xof(), 66_375 + 32_332);
        assert_eq!(stats.total_sales_count, 2);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.low_stock_products[0].id, "2");
        assert_eq!(stats.customers_count, 3);
        assert_eq!(stats.recent_sales[0].id, "INV-002");
    }

    #[test]
    fn test_dashboard_threshold_is_configurable() {
        let (invoices, products, _) = fixtures();
        assert_eq!(dashboard(&invoices, &products, 0, 22).low_stock_count, 2);
        assert_eq!(dashboard(&invoices, &products, 0, 10).low_stock_count, 0);
    }

    #[test]
    fn test_top_products_by_quantity() {
        let (invoices, products, _) = fixtures();
        let top = top_products(&invoices, &products, 5);

        assert_eq!(top.len(), 3);
        assert_eq!(top[0].product_id, "1");
        assert_eq!(top[0].quantity, 2);
        assert_eq!(top[0].name, "Filtre à huile Bosch");
        assert!(top.iter().all(|t| t.product_id != "5"));
    }

    #[test]
    fn test_top_brands_by_amount() {
        let (invoices, products, brands) = fixtures();
        let top = top_brands(&invoices, &products, &brands, 5);

        assert_eq!(top[0].brand, "Bosch");
        assert_eq!(top[0].sales.xof(), 66_375 + 15_340);
        assert_eq!(top[1].brand, "Total");
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_monthly_and_weekday_sales() {
        let (invoices, _, _) = fixtures();
        let months = monthly_sales(&invoices, 2023);

        assert_eq!(months.len(), 12);
        assert_eq!(months[9].label, "Oct");
        assert_eq!(months[9].amount.xof(), 98_707);
        assert!(months[10].amount.is_zero());
        assert!(monthly_sales(&invoices, 2022).iter().all(|m| m.amount.is_zero()));

        // 2023-10-25 is a Wednesday, 2023-10-26 a Thursday
        let days = weekday_sales(&invoices);
        assert_eq!(days[2].day, weekday_label(Weekday::Wed));
        assert_eq!(days[2].amount.xof(), 32_332);
        assert_eq!(days[3].amount.xof(), 66_375);
        assert!(days[4].amount.is_zero());
    }
}
