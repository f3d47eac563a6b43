//! # Error Types
//!
//! Domain-specific error types for autoparts-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  autoparts-core errors (this file)                                     │
//! │  ├── CoreError        - Commerce rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  autoparts-db errors (separate crate)                                  │
//! │  └── DbError          - Store and repository failures                  │
//! │                                                                         │
//! │  HTTP errors (in backoffice-api)                                       │
//! │  └── ApiError         - What the front-end sees (JSON)                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Browser      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product, document, line id)
//! 3. Errors are enum variants, never String
//! 4. A failed operation never leaves partial state behind

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Commerce rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not resolve.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer id does not resolve.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Invoice or proforma id does not resolve.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Cart line id does not resolve.
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// A stock-out or a sale would drive stock below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (Batterie Bosch S4 × 20)
    ///      │
    ///      ▼
    /// Check stock: available=15
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Batterie Bosch S4", available: 15, requested: 20 }
    ///      │
    ///      ▼
    /// Nothing is decremented, the cart is kept
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Checkout or proforma with zero lines.
    #[error("Document has no lines")]
    EmptyDocument,

    /// The flow requires a customer and none is selected.
    #[error("A customer must be selected")]
    MissingCustomer,

    /// Line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Document has reached its maximum number of lines.
    #[error("Document cannot have more than {max} lines")]
    DocumentTooLarge { max: usize },

    /// Only proformas can be converted to a sale.
    #[error("Document {0} is not a proforma")]
    NotAProforma(String),

    /// The proforma already produced a sale.
    #[error("Proforma {proforma_id} was already converted to {sale_id}")]
    AlreadyConverted { proforma_id: String, sale_id: String },

    /// A document with this id is already registered.
    #[error("Document {0} already exists")]
    DuplicateDocument(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business rule runs, so a rejected input changes nothing.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (barcode, email, date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., barcode already used by another product).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
