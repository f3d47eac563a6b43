//! # Document Registry
//!
//! Holds every sale invoice and proforma, newest first, and owns the
//! transitions between them.
//!
//! ## Identifiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One counter per document type, formatted with 4 digits:               │
//! │                                                                         │
//! │    Sale      INV-0001, INV-0002, ...                                   │
//! │    Proforma  PRO-0001, PRO-0002, ...                                   │
//! │                                                                         │
//! │  Counters start past the highest suffix already registered, so seeded  │
//! │  "INV-002" makes the next sale "INV-0003". Inserting an id that is     │
//! │  already present is an error.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Proforma Conversion
//! ```text
//! PRO-0001 (unpaid quote)
//!      │  prepare_conversion()   copies customer + lines, fresh INV- id
//!      ▼
//! INV-0004 { paid: false, converted_from: PRO-0001 }
//!      │  record_conversion()
//!      ▼
//! PRO-0001 { converted_to: INV-0004 }   (second attempt → AlreadyConverted)
//! ```

use chrono::NaiveDate;
use serde::Deserialize;

use crate::document::{DocumentDraft, DocumentHeader};
use crate::error::{CoreError, CoreResult};
use crate::types::{DocumentType, Invoice, TaxRate};

/// List filter; every present criterion must match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    pub document_type: Option<DocumentType>,
    pub paid: Option<bool>,
    /// Case-insensitive substring of the id or the customer name.
    pub search: Option<String>,
}

impl DocumentFilter {
    fn matches(&self, invoice: &Invoice, customer_name: &str) -> bool {
        let type_ok = self
            .document_type
            .map_or(true, |wanted| invoice.document_type == wanted);
        let paid_ok = self.paid.map_or(true, |wanted| invoice.paid == wanted);
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                invoice.id.to_lowercase().contains(&needle)
                    || customer_name.to_lowercase().contains(&needle)
            }
        };
        type_ok && paid_ok && search_ok
    }
}

#[derive(Debug, Clone)]
pub struct DocumentRegistry {
    documents: Vec<Invoice>,
    next_sale: u32,
    next_proforma: u32,
}

impl Default for DocumentRegistry {
    fn default() -> Self {
        DocumentRegistry {
            documents: Vec::new(),
            next_sale: 1,
            next_proforma: 1,
        }
    }
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from documents already ordered newest first.
    pub fn from_documents(documents: Vec<Invoice>) -> CoreResult<Self> {
        let mut registry = DocumentRegistry::new();
        for invoice in documents.into_iter().rev() {
            registry.insert(invoice)?;
        }
        Ok(registry)
    }

    /// The id the next document of this type will get.
    pub fn next_id(&self, document_type: DocumentType) -> String {
        let counter = match document_type {
            DocumentType::Sale => self.next_sale,
            DocumentType::Proforma => self.next_proforma,
        };
        format!("{}-{:04}", document_type.prefix(), counter)
    }

    /// Registers a document at the front of the list.
    pub fn insert(&mut self, invoice: Invoice) -> CoreResult<()> {
        if self.documents.iter().any(|doc| doc.id == invoice.id) {
            return Err(CoreError::DuplicateDocument(invoice.id));
        }

        if let Some(suffix) = numeric_suffix(&invoice.id, invoice.document_type) {
            let counter = match invoice.document_type {
                DocumentType::Sale => &mut self.next_sale,
                DocumentType::Proforma => &mut self.next_proforma,
            };
            if suffix >= *counter {
                *counter = suffix.saturating_add(1);
            }
        }

        self.documents.insert(0, invoice);
        Ok(())
    }

    pub fn get(&self, id: &str) -> CoreResult<&Invoice> {
        self.documents
            .iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| CoreError::DocumentNotFound(id.to_string()))
    }

    pub fn all(&self) -> &[Invoice] {
        &self.documents
    }

    /// Documents matching `filter`, newest first.
    ///
    /// `customer_name` resolves a document's customer for the text search.
    pub fn list<F>(&self, filter: &DocumentFilter, customer_name: F) -> Vec<&Invoice>
    where
        F: Fn(Option<&str>) -> String,
    {
        self.documents
            .iter()
            .filter(|doc| filter.matches(doc, &customer_name(doc.customer_id.as_deref())))
            .collect()
    }

    /// Flags a document as paid. Marking a paid document again is a no-op.
    pub fn mark_paid(&mut self, id: &str) -> CoreResult<&Invoice> {
        let document = self
            .documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| CoreError::DocumentNotFound(id.to_string()))?;
        document.paid = true;
        Ok(document)
    }

    /// Returns the proforma if it can still be converted.
    pub fn ensure_convertible(&self, id: &str) -> CoreResult<&Invoice> {
        let document = self.get(id)?;
        if document.document_type != DocumentType::Proforma {
            return Err(CoreError::NotAProforma(id.to_string()));
        }
        if let Some(sale_id) = &document.converted_to {
            return Err(CoreError::AlreadyConverted {
                proforma_id: id.to_string(),
                sale_id: sale_id.clone(),
            });
        }
        Ok(document)
    }

    /// Builds the sale a proforma converts into, without registering it.
    ///
    /// The sale keeps the quoted lines and prices, is unpaid, and gets the
    /// next `INV-` id.
    pub fn prepare_conversion(
        &self,
        proforma_id: &str,
        date: NaiveDate,
        created_by: String,
        rate: TaxRate,
    ) -> CoreResult<Invoice> {
        let proforma = self.ensure_convertible(proforma_id)?;
        let draft = DocumentDraft::from_items(proforma.items.clone(), proforma.customer_id.clone());
        draft.ensure_ready(DocumentType::Sale.into())?;

        let header = DocumentHeader {
            id: self.next_id(DocumentType::Sale),
            date,
            document_type: DocumentType::Sale,
            created_by,
            paid: false,
            payment_method: None,
        };
        let mut sale = draft.to_invoice(header, rate);
        sale.converted_from = Some(proforma.id.clone());
        Ok(sale)
    }

    /// Registers a sale built by [`prepare_conversion`](Self::prepare_conversion)
    /// and links the proforma to it.
    pub fn record_conversion(&mut self, sale: Invoice) -> CoreResult<()> {
        let proforma_id = sale
            .converted_from
            .clone()
            .ok_or_else(|| CoreError::NotAProforma(sale.id.clone()))?;
        self.ensure_convertible(&proforma_id)?;

        let sale_id = sale.id.clone();
        self.insert(sale)?;
        if let Some(proforma) = self.documents.iter_mut().find(|doc| doc.id == proforma_id) {
            proforma.converted_to = Some(sale_id);
        }
        Ok(())
    }

    /// Prepares and records a conversion in one step.
    pub fn convert_proforma_to_sale(
        &mut self,
        proforma_id: &str,
        date: NaiveDate,
        created_by: String,
        rate: TaxRate,
    ) -> CoreResult<Invoice> {
        let sale = self.prepare_conversion(proforma_id, date, created_by, rate)?;
        self.record_conversion(sale.clone())?;
        Ok(sale)
    }
}

/// Parses `"INV-0012"` / `"INV-002"` into 12 / 2 for the matching type.
fn numeric_suffix(id: &str, document_type: DocumentType) -> Option<u32> {
    id.strip_prefix(document_type.prefix())?
        .strip_prefix('-')?
        .parse()
        .ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::InvoiceItem;
    use crate::VAT_RATE;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, d).unwrap()
    }

    fn item(product_id: &str, quantity: i64, unit: i64) -> InvoiceItem {
        InvoiceItem {
            id: product_id.to_string(),
            product_id: product_id.to_string(),
            product_name: format!("Part {product_id}"),
            quantity,
            unit_price: Money::from_xof(unit),
            total: Money::from_xof(unit * quantity),
            tax_included: true,
        }
    }

    fn doc(id: &str, document_type: DocumentType, customer: Option<&str>, paid: bool) -> Invoice {
        Invoice {
            id: id.to_string(),
            date: day(25),
            customer_id: customer.map(str::to_string),
            items: vec![item("4", 1, 28_674), item("5", 4, 4_956)],
            subtotal: Money::from_xof(41_100),
            tax: Money::from_xof(7_398),
            total: Money::from_xof(48_498),
            paid,
            document_type,
            created_by: "1".to_string(),
            payment_method: None,
            converted_from: None,
            converted_to: None,
        }
    }

    fn seeded() -> DocumentRegistry {
        DocumentRegistry::from_documents(vec![
            doc("PRO-001", DocumentType::Proforma, Some("3"), false),
            doc("INV-002", DocumentType::Sale, Some("2"), true),
            doc("INV-001", DocumentType::Sale, Some("1"), true),
        ])
        .unwrap()
    }

    fn names(id: Option<&str>) -> String {
        match id {
            Some("1") => "Jean Dupont".to_string(),
            Some("2") => "Marie Koné".to_string(),
            Some("3") => "Amadou Diallo".to_string(),
            Some(_) => "Unknown customer".to_string(),
            None => "Walk-in customer".to_string(),
        }
    }

    #[test]
    fn test_seeded_order_is_preserved() {
        let registry = seeded();
        let ids: Vec<&str> = registry.all().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["PRO-001", "INV-002", "INV-001"]);
    }

    #[test]
    fn test_counters_start_past_seeded_ids() {
        let registry = seeded();
        assert_eq!(registry.next_id(DocumentType::Sale), "INV-0003");
        assert_eq!(registry.next_id(DocumentType::Proforma), "PRO-0002");
        assert_eq!(DocumentRegistry::new().next_id(DocumentType::Sale), "INV-0001");
    }

    #[test]
    fn test_insert_prepends_and_advances_counter() {
        let mut registry = seeded();
        let id = registry.next_id(DocumentType::Sale);
        registry
            .insert(doc(&id, DocumentType::Sale, None, true))
            .unwrap();

        assert_eq!(registry.all()[0].id, "INV-0003");
        assert_eq!(registry.next_id(DocumentType::Sale), "INV-0004");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = seeded();
        let err = registry
            .insert(doc("INV-001", DocumentType::Sale, None, true))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateDocument(id) if id == "INV-001"));
        assert_eq!(registry.all().len(), 3);
    }

    #[test]
    fn test_list_filters_are_anded() {
        let registry = seeded();

        let sales = registry.list(
            &DocumentFilter {
                document_type: Some(DocumentType::Sale),
                ..Default::default()
            },
            names,
        );
        assert_eq!(sales.len(), 2);

        let unpaid = registry.list(
            &DocumentFilter {
                paid: Some(false),
                ..Default::default()
            },
            names,
        );
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].id, "PRO-001");

        let by_name = registry.list(
            &DocumentFilter {
                search: Some("marie".to_string()),
                ..Default::default()
            },
            names,
        );
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "INV-002");

        let none = registry.list(
            &DocumentFilter {
                document_type: Some(DocumentType::Proforma),
                search: Some("inv".to_string()),
                ..Default::default()
            },
            names,
        );
        assert!(none.is_empty());

        assert_eq!(registry.list(&DocumentFilter::default(), names).len(), 3);
    }

    #[test]
    fn test_mark_paid_is_idempotent() {
        let mut registry = seeded();

        assert!(registry.mark_paid("PRO-001").unwrap().paid);
        assert!(registry.mark_paid("PRO-001").unwrap().paid);
        assert!(registry.get("PRO-001").unwrap().paid);

        assert!(matches!(
            registry.mark_paid("INV-999"),
            Err(CoreError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_convert_proforma_to_sale() {
        let mut registry = seeded();

        let sale = registry
            .convert_proforma_to_sale("PRO-001", day(28), "2".to_string(), VAT_RATE)
            .unwrap();

        assert_eq!(sale.id, "INV-0003");
        assert_eq!(sale.document_type, DocumentType::Sale);
        assert!(!sale.paid);
        assert_eq!(sale.customer_id.as_deref(), Some("3"));
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.subtotal.xof(), 41_100);
        assert_eq!(sale.tax.xof(), 7_398);
        assert_eq!(sale.total.xof(), 48_498);
        assert_eq!(sale.converted_from.as_deref(), Some("PRO-001"));

        assert_eq!(registry.all()[0].id, "INV-0003");
        let proforma = registry.get("PRO-001").unwrap();
        assert_eq!(proforma.converted_to.as_deref(), Some("INV-0003"));
    }

    #[test]
    fn test_convert_twice_or_sale_rejected() {
        let mut registry = seeded();
        registry
            .convert_proforma_to_sale("PRO-001", day(28), "1".to_string(), VAT_RATE)
            .unwrap();

        let again = registry.convert_proforma_to_sale("PRO-001", day(29), "1".to_string(), VAT_RATE);
        assert!(matches!(again, Err(CoreError::AlreadyConverted { .. })));

        let sale = registry.convert_proforma_to_sale("INV-001", day(29), "1".to_string(), VAT_RATE);
        assert!(matches!(sale, Err(CoreError::NotAProforma(_))));

        assert_eq!(registry.all().len(), 4);
    }

    #[test]
    fn test_prepare_conversion_does_not_register() {
        let registry = seeded();
        let sale = registry
            .prepare_conversion("PRO-001", day(28), "1".to_string(), VAT_RATE)
            .unwrap();
        assert_eq!(sale.id, "INV-0003");
        assert_eq!(registry.all().len(), 3);
        assert!(registry.get("PRO-001").unwrap().converted_to.is_none());
    }
}
