//! # Invoice Repository
//!
//! Sale invoices and proformas: listing, payment, POS checkout, proforma
//! creation and proforma → sale conversion.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(cart, method, stamp)                                         │
//! │                                                                         │
//! │  tables.write() ─────────────────────────────────────────────┐         │
//! │    1. cart.ensure_ready()          EmptyDocument              │         │
//! │    2. customer exists?             CustomerNotFound           │ validate│
//! │    3. cart.to_invoice(INV-nnnn)                               │         │
//! │    4. plan_sale_consumption()      InsufficientStock          │         │
//! │  ─────────────────────────────────────────────────────────────┤         │
//! │    5. registry.insert(invoice)     DuplicateDocument          │         │
//! │    6. plan.apply() → sale entries                             │ apply   │
//! │    7. loyalty::accrue(customer)                               │         │
//! │    8. cart.clear()                                            │         │
//! │  guard dropped ──────────────────────────────────────────────┘         │
//! │                                                                         │
//! │  Any error in 1-5 returns before a single table has changed.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conversion follows the same steps with the proforma's quoted lines.

use autoparts_core::customer::customer_name;
use autoparts_core::document::{CustomerRequirement, DocumentDraft, DocumentHeader, LinePricing};
use autoparts_core::loyalty::accrue;
use autoparts_core::registry::DocumentFilter;
use autoparts_core::stock::{plan_sale_consumption, EntryStamp};
use autoparts_core::{DocumentType, Invoice, PaymentMethod, VAT_RATE};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::tables::{SharedTables, Tables};

/// One requested proforma line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProformaLine {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default = "default_tax_included")]
    pub tax_included: bool,
}

fn default_quantity() -> i64 {
    1
}

fn default_tax_included() -> bool {
    true
}

/// Proforma form payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProformaRequest {
    #[serde(default)]
    pub customer_id: Option<String>,
    pub lines: Vec<ProformaLine>,
}

#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    tables: SharedTables,
}

impl InvoiceRepository {
    pub fn new(tables: SharedTables) -> Self {
        InvoiceRepository { tables }
    }

    /// Documents matching `filter`, newest first.
    pub async fn list(&self, filter: DocumentFilter) -> DbResult<Vec<Invoice>> {
        let tables = self.tables.read().await;
        let customers = &tables.customers;
        Ok(tables
            .documents
            .list(&filter, |id| customer_name(customers, id).to_string())
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn get(&self, id: &str) -> DbResult<Invoice> {
        let tables = self.tables.read().await;
        Ok(tables.documents.get(id)?.clone())
    }

    /// Flags a document as paid; repeating the call changes nothing.
    pub async fn mark_paid(&self, id: &str) -> DbResult<Invoice> {
        let mut tables = self.tables.write().await;
        let invoice = tables.documents.mark_paid(id)?.clone();
        info!(id = %id, "Document marked paid");
        Ok(invoice)
    }

    /// Turns the POS cart into a paid sale invoice.
    ///
    /// On success stock is consumed, the customer (if any) earns loyalty
    /// points and the cart is cleared. On error nothing changes, the cart
    /// included.
    pub async fn checkout(
        &self,
        cart: &mut DocumentDraft,
        method: PaymentMethod,
        stamp: &EntryStamp,
    ) -> DbResult<Invoice> {
        let mut tables = self.tables.write().await;

        cart.ensure_ready(CustomerRequirement::Optional)?;
        if let Some(customer_id) = cart.customer_id() {
            tables.customer(customer_id)?;
        }

        let header = DocumentHeader::sale(
            tables.documents.next_id(DocumentType::Sale),
            stamp.date,
            stamp.created_by.clone(),
            method,
        );
        let invoice = cart.to_invoice(header, VAT_RATE);

        record_sale(&mut tables, invoice.clone(), stamp)?;
        cart.clear();

        info!(
            id = %invoice.id,
            total = %invoice.total,
            lines = invoice.items.len(),
            "Sale completed"
        );
        Ok(invoice)
    }

    /// Registers a proforma for a customer. Stock is not touched.
    pub async fn create_proforma(
        &self,
        request: ProformaRequest,
        stamp: &EntryStamp,
    ) -> DbResult<Invoice> {
        let mut tables = self.tables.write().await;

        let mut draft = DocumentDraft::new();
        for line in &request.lines {
            let product = tables.product(&line.product_id)?;
            draft.add_line(
                product,
                line.quantity,
                LinePricing::from_tax_included(line.tax_included),
            )?;
        }
        if let Some(customer_id) = &request.customer_id {
            tables.customer(customer_id)?;
        }
        draft.set_customer(request.customer_id);

        let header = DocumentHeader::proforma(
            tables.documents.next_id(DocumentType::Proforma),
            stamp.date,
            stamp.created_by.clone(),
        );
        let proforma = draft.finalize(header, VAT_RATE)?;
        tables.documents.insert(proforma.clone())?;

        info!(id = %proforma.id, total = %proforma.total, "Proforma created");
        Ok(proforma)
    }

    /// Converts an open proforma into an unpaid sale invoice.
    ///
    /// The sale keeps the quoted prices, consumes stock and credits the
    /// customer exactly like a POS sale. The proforma is linked to it and can
    /// not be converted again.
    pub async fn convert_proforma(&self, proforma_id: &str, stamp: &EntryStamp) -> DbResult<Invoice> {
        let mut tables = self.tables.write().await;

        let sale = tables.documents.prepare_conversion(
            proforma_id,
            stamp.date,
            stamp.created_by.clone(),
            VAT_RATE,
        )?;
        if let Some(customer_id) = &sale.customer_id {
            tables.customer(customer_id)?;
        }

        let plan = plan_sale_consumption(&tables.products, &sale.items)?;
        tables.documents.record_conversion(sale.clone())?;
        apply_consumption(&mut tables, plan, &sale, stamp)?;

        info!(
            proforma = %proforma_id,
            sale = %sale.id,
            total = %sale.total,
            "Proforma converted"
        );
        Ok(sale)
    }
}

/// Validates stock for `invoice`, registers it, then applies stock and
/// loyalty. Returns before any change if stock or registration fails.
fn record_sale(tables: &mut Tables, invoice: Invoice, stamp: &EntryStamp) -> DbResult<()> {
    let plan = plan_sale_consumption(&tables.products, &invoice.items)?;
    tables.documents.insert(invoice.clone())?;
    apply_consumption(tables, plan, &invoice, stamp)
}

/// Applies a consumption plan and credits the customer.
///
/// Callers hold the write guard and have already planned the stock and
/// resolved the customer, so neither lookup fails here.
fn apply_consumption(
    tables: &mut Tables,
    plan: autoparts_core::stock::ConsumptionPlan,
    invoice: &Invoice,
    stamp: &EntryStamp,
) -> DbResult<()> {
    let entries = plan.apply(&mut tables.products, stamp, &invoice.id)?;
    debug!(id = %invoice.id, entries = entries.len(), "Stock consumed");
    tables.stock_entries.splice(0..0, entries);

    if let Some(customer_id) = &invoice.customer_id {
        let customer = tables.customer_mut(customer_id)?;
        let points = accrue(customer, invoice);
        debug!(customer = %customer_id, points, "Loyalty points credited");
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
