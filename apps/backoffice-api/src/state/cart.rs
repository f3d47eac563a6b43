//! # Cart State
//!
//! One point-of-sale cart per signed-in user.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Request                      Handler              DocumentDraft        │
//! │  ───────                      ───────              ─────────────        │
//! │                                                                         │
//! │  POST   /cart/items ────────► add_item() ────────► add_line()           │
//! │  PATCH  /cart/items/{id} ───► change_item() ─────► change_quantity()    │
//! │  DELETE /cart/items/{id} ───► remove_item() ─────► remove_line()        │
//! │  PUT    /cart/customer ─────► set_customer() ────► set_customer()       │
//! │  DELETE /cart ──────────────► clear_cart() ──────► clear()              │
//! │  POST   /cart/checkout ─────► checkout() ────────► InvoiceRepository    │
//! │                                                    ::checkout()         │
//! │                                                                         │
//! │  NOTE: the map is locked for the whole checkout so a second request     │
//! │        from the same user cannot sell the same cart twice.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use autoparts_core::document::DocumentDraft;
use autoparts_core::CoreResult;
use tokio::sync::{Mutex, MutexGuard};

/// Carts keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    carts: Arc<Mutex<HashMap<String, DocumentDraft>>>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the user's cart (empty when none was started).
    pub async fn snapshot(&self, user_id: &str) -> DocumentDraft {
        self.carts
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Applies `f` to the user's cart and returns its result with a copy of
    /// the cart afterwards. A failing `f` leaves the cart as it was.
    pub async fn update<F, T>(&self, user_id: &str, f: F) -> CoreResult<(T, DocumentDraft)>
    where
        F: FnOnce(&mut DocumentDraft) -> CoreResult<T>,
    {
        let mut carts = self.carts.lock().await;
        let cart = carts.entry(user_id.to_string()).or_default();
        let mut working = cart.clone();
        let value = f(&mut working)?;
        *cart = working.clone();
        Ok((value, working))
    }

    /// Exclusive access to every cart, held across the checkout.
    pub async fn lock(&self) -> MutexGuard<'_, HashMap<String, DocumentDraft>> {
        self.carts.lock().await
    }

    /// Drops the user's cart (sign-out).
    pub async fn discard(&self, user_id: &str) {
        self.carts.lock().await.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoparts_core::document::LinePricing;
    use autoparts_core::{Money, Product, VAT_RATE};

    fn product() -> Product {
        let mut product = Product {
            id: "1".to_string(),
            name: "Filtre à huile Bosch".to_string(),
            barcode: String::new(),
            category_id: "1".to_string(),
            brand_id: "1".to_string(),
            compatible_cars: Vec::new(),
            purchase_price: Money::from_xof(5000),
            margin_bps: 3000,
            selling_price_excluding_tax: Money::zero(),
            selling_price_with_tax: Money::zero(),
            stock: 50,
            image: None,
        };
        product.reprice(VAT_RATE);
        product
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let carts = CartState::new();
        carts
            .update("1", |cart| {
                cart.add_line(&product(), 2, LinePricing::TaxIncluded)?;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(carts.snapshot("1").await.items().len(), 1);
        assert!(carts.snapshot("2").await.is_empty());

        carts.discard("1").await;
        assert!(carts.snapshot("1").await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_cart() {
        let carts = CartState::new();
        let ((), cart) = carts
            .update("1", |cart| {
                cart.add_line(&product(), 2, LinePricing::TaxIncluded)?;
                Ok(())
            })
            .await
            .unwrap();
        let line_id = cart.items()[0].id.clone();

        let result = carts
            .update("1", |cart| {
                cart.change_quantity(&line_id, 1)?;
                cart.add_line(&product(), 5000, LinePricing::TaxIncluded)?;
                Ok(())
            })
            .await;
        assert!(result.is_err());
        assert_eq!(carts.snapshot("1").await.items()[0].quantity, 2);
    }
}
