//! # Cart / Document Aggregator
//!
//! Maintains the ordered lines of an in-progress document (the POS cart or a
//! proforma draft) and computes its totals.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DocumentDraft Operations                             │
//! │                                                                         │
//! │  Screen Action            Operation                State Change         │
//! │  ─────────────            ─────────                ────────────         │
//! │                                                                         │
//! │  Click Product ─────────► add_line() ────────────► merge or push line   │
//! │                                                                         │
//! │  + / - buttons ─────────► change_quantity() ─────► q = max(1, q + d)    │
//! │                                                                         │
//! │  Trash icon ────────────► remove_line() ─────────► line deleted         │
//! │                                                                         │
//! │  Pick customer ─────────► set_customer() ────────► customer_id          │
//! │                                                                         │
//! │  Checkout / Create ─────► finalize() ────────────► Invoice, draft empty │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! Line totals are the source of truth. The grand total is their sum.
//! Tax-included lines are split with [`split_tax_included`]; tax-excluded
//! lines add their total to the subtotal and nothing to the tax, so
//! `subtotal + tax == total` holds for any mix of lines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::split_tax_included;
use crate::types::{DocumentType, Invoice, InvoiceItem, PaymentMethod, Product, TaxRate};
use crate::validation::{validate_quantity, validate_unit_price};
use crate::{MAX_DOCUMENT_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Policies
// =============================================================================

/// Which selling price a line snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LinePricing {
    /// TTC price; the only mode used by the POS.
    TaxIncluded,
    /// HT price; available per line on proformas.
    TaxExcluded,
}

impl LinePricing {
    pub const fn from_tax_included(tax_included: bool) -> Self {
        if tax_included {
            LinePricing::TaxIncluded
        } else {
            LinePricing::TaxExcluded
        }
    }

    pub const fn is_tax_included(&self) -> bool {
        matches!(self, LinePricing::TaxIncluded)
    }

    fn unit_price(&self, product: &Product) -> Money {
        match self {
            LinePricing::TaxIncluded => product.selling_price_with_tax,
            LinePricing::TaxExcluded => product.selling_price_excluding_tax,
        }
    }
}

/// Whether finalizing a document needs a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerRequirement {
    Optional,
    Required,
}

impl From<DocumentType> for CustomerRequirement {
    fn from(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::Sale => CustomerRequirement::Optional,
            DocumentType::Proforma => CustomerRequirement::Required,
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregates of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    /// Number of lines.
    pub item_count: usize,
    /// Sum of line quantities.
    pub quantity: i64,
}

/// Computes totals over any set of lines.
pub fn compute_totals(items: &[InvoiceItem], rate: TaxRate) -> DocumentTotals {
    items.iter().fold(
        DocumentTotals {
            item_count: items.len(),
            ..DocumentTotals::default()
        },
        |mut acc, item| {
            if item.tax_included {
                let split = split_tax_included(item.total, rate);
                acc.subtotal += split.excluding_tax;
                acc.tax += split.tax;
            } else {
                acc.subtotal += item.total;
            }
            acc.total += item.total;
            acc.quantity += item.quantity;
            acc
        },
    )
}

// =============================================================================
// Header
// =============================================================================

/// Everything a finalized document needs besides its lines.
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    pub id: String,
    pub date: NaiveDate,
    pub document_type: DocumentType,
    pub created_by: String,
    pub paid: bool,
    pub payment_method: Option<PaymentMethod>,
}

impl DocumentHeader {
    /// Header for a POS sale: paid on the spot.
    pub fn sale(id: String, date: NaiveDate, created_by: String, method: PaymentMethod) -> Self {
        DocumentHeader {
            id,
            date,
            document_type: DocumentType::Sale,
            created_by,
            paid: true,
            payment_method: Some(method),
        }
    }

    /// Header for a proforma: never paid, no payment method.
    pub fn proforma(id: String, date: NaiveDate, created_by: String) -> Self {
        DocumentHeader {
            id,
            date,
            document_type: DocumentType::Proforma,
            created_by,
            paid: false,
            payment_method: None,
        }
    }
}

// =============================================================================
// Draft
// =============================================================================

/// An in-progress cart or proforma.
///
/// ## Invariants
/// - Lines are unique by (product, pricing mode)
/// - Every line has `1 <= quantity <= MAX_ITEM_QUANTITY`
/// - Every line has `total == unit_price × quantity`
/// - At most `MAX_DOCUMENT_LINES` lines
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    items: Vec<InvoiceItem>,
    customer_id: Option<String>,
}

impl DocumentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a draft from already-priced lines (proforma conversion).
    pub fn from_items(items: Vec<InvoiceItem>, customer_id: Option<String>) -> Self {
        DocumentDraft { items, customer_id }
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `quantity` units of `product`.
    ///
    /// ## Behavior
    /// - A line for the same product and pricing exists: its quantity grows
    /// - Otherwise a new line snapshots the product's name and unit price
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: i64,
        pricing: LinePricing,
    ) -> CoreResult<&InvoiceItem> {
        validate_quantity(quantity)?;

        let existing = self.items.iter().position(|item| {
            item.product_id == product.id && item.tax_included == pricing.is_tax_included()
        });

        let index = match existing {
            Some(index) => {
                let item = &mut self.items[index];
                let requested = item.quantity + quantity;
                if requested > MAX_ITEM_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested,
                        max: MAX_ITEM_QUANTITY,
                    });
                }
                item.quantity = requested;
                item.recompute_total();
                index
            }
            None => {
                if self.items.len() >= MAX_DOCUMENT_LINES {
                    return Err(CoreError::DocumentTooLarge {
                        max: MAX_DOCUMENT_LINES,
                    });
                }
                let unit_price = pricing.unit_price(product);
                validate_unit_price(unit_price)?;
                self.items.push(InvoiceItem {
                    id: Uuid::new_v4().to_string(),
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    quantity,
                    unit_price,
                    total: unit_price.multiply_quantity(quantity),
                    tax_included: pricing.is_tax_included(),
                });
                self.items.len() - 1
            }
        };

        Ok(&self.items[index])
    }

    /// Moves a line's quantity by `delta`, never below 1.
    ///
    /// A result above `MAX_ITEM_QUANTITY` is rejected and the line is left
    /// as it was.
    pub fn change_quantity(&mut self, line_id: &str, delta: i64) -> CoreResult<&InvoiceItem> {
        let index = self.line_index(line_id)?;
        let item = &mut self.items[index];

        let requested = item.quantity.saturating_add(delta).max(1);
        if requested > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_ITEM_QUANTITY,
            });
        }
        item.quantity = requested;
        item.recompute_total();

        Ok(&self.items[index])
    }

    pub fn remove_line(&mut self, line_id: &str) -> CoreResult<InvoiceItem> {
        let index = self.line_index(line_id)?;
        Ok(self.items.remove(index))
    }

    pub fn set_customer(&mut self, customer_id: Option<String>) {
        self.customer_id = customer_id;
    }

    /// Empties the draft and forgets the customer.
    pub fn clear(&mut self) {
        self.items.clear();
        self.customer_id = None;
    }

    pub fn totals(&self, rate: TaxRate) -> DocumentTotals {
        compute_totals(&self.items, rate)
    }

    /// Checks the draft can be finalized without touching it.
    pub fn ensure_ready(&self, requirement: CustomerRequirement) -> CoreResult<()> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyDocument);
        }
        if requirement == CustomerRequirement::Required && self.customer_id.is_none() {
            return Err(CoreError::MissingCustomer);
        }
        Ok(())
    }

    /// Produces the immutable document and clears the draft.
    ///
    /// On error the draft is left untouched.
    pub fn finalize(&mut self, header: DocumentHeader, rate: TaxRate) -> CoreResult<Invoice> {
        self.ensure_ready(header.document_type.into())?;
        let invoice = self.to_invoice(header, rate);
        self.clear();
        Ok(invoice)
    }

    /// Builds the document a [`finalize`](Self::finalize) call would return,
    /// leaving the draft as it is.
    pub fn to_invoice(&self, header: DocumentHeader, rate: TaxRate) -> Invoice {
        let totals = self.totals(rate);
        Invoice {
            id: header.id,
            date: header.date,
            customer_id: self.customer_id.clone(),
            items: self.items.clone(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            paid: header.paid,
            document_type: header.document_type,
            created_by: header.created_by,
            payment_method: header.payment_method,
            converted_from: None,
            converted_to: None,
        }
    }

    fn line_index(&self, line_id: &str) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
