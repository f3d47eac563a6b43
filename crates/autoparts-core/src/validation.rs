//! # Validation Module
//!
//! Input validation for the back-office forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repository                                                   │
//! │  ├── Referenced ids exist                                              │
//! │  └── Unique barcodes                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use autoparts_core::validation::{validate_barcode, validate_quantity};
//!
//! assert!(validate_barcode("4001234567890").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{
    MAX_AMOUNT_XOF, MAX_ITEM_QUANTITY, MAX_MOVEMENT_QUANTITY, MAX_STOCK_LEVEL, MAX_UNIT_PRICE_XOF,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted margin: 1000%.
pub const MAX_MARGIN_BPS: u32 = 100_000;

// =============================================================================
// String Validators
// =============================================================================

/// Trims `value` and checks it is present and at most `max` characters.
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a product name: required, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_required("name", name, 200)
}

/// Validates an optional EAN/UPC barcode.
///
/// ## Rules
/// - Empty is allowed (part without barcode)
/// - Otherwise 8 to 14 ASCII digits
///
/// ## Example
/// ```rust
/// use autoparts_core::validation::validate_barcode;
///
/// assert!(validate_barcode("").is_ok());
/// assert!(validate_barcode("3305678901234").is_ok());
/// assert!(validate_barcode("ABC-123").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Ok(String::new());
    }

    if !barcode.chars().all(|c| c.is_ascii_digit()) || !(8..=14).contains(&barcode.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must be 8 to 14 digits".to_string(),
        });
    }

    Ok(barcode.to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    validate_required("name", name, 120)
}

/// Validates a phone number.
///
/// ## Rules
/// - Required
/// - Digits, spaces, `+`, `-`, `(` and `)` only, with at least 6 digits
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = validate_required("phone", phone, 30)?;

    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !allowed || digits < 6 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be a phone number".to_string(),
        });
    }

    Ok(phone)
}

/// Validates an optional email address. Blank becomes `None`.
pub fn validate_email(email: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be an email address".to_string(),
        });
    }

    Ok(Some(email.to_string()))
}

pub fn validate_expense_category(category: &str) -> ValidationResult<String> {
    validate_required("category", category, 100)
}

pub fn validate_company_name(name: &str) -> ValidationResult<String> {
    validate_required("name", name, 120)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Proforma: Add Line                                                     │
/// │                                                                         │
/// │  User enters quantity: 4                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(4) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → add_line                                                │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the quantity of a stock movement: 1 to MAX_MOVEMENT_QUANTITY.
pub fn validate_movement_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_MOVEMENT_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_MOVEMENT_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price: 0 to MAX_AMOUNT_XOF.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.xof() > MAX_AMOUNT_XOF {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_XOF,
        });
    }

    Ok(())
}

/// Validates the unit price frozen on a document line.
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.xof() > MAX_UNIT_PRICE_XOF {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_XOF,
        });
    }

    Ok(())
}

pub fn validate_margin_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_MARGIN_BPS {
        return Err(ValidationError::OutOfRange {
            field: "margin".to_string(),
            min: 0,
            max: MAX_MARGIN_BPS as i64,
        });
    }

    Ok(())
}

pub fn validate_stock_level(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK_LEVEL).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK_LEVEL,
        });
    }

    Ok(())
}

/// Validates an expense amount: 1 to MAX_AMOUNT_XOF.
pub fn validate_expense_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if amount.xof() > MAX_AMOUNT_XOF {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: MAX_AMOUNT_XOF,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert_eq!(
            validate_product_name("  Filtre à huile Bosch ").unwrap(),
            "Filtre à huile Bosch"
        );
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert_eq!(validate_barcode(" ").unwrap(), "");
        assert!(validate_barcode("4001234567890").is_ok());
        assert!(validate_barcode("12345678").is_ok());
        assert!(validate_barcode("1234567").is_err());
        assert!(validate_barcode("123456789012345").is_err());
        assert!(validate_barcode("40012345678AB").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_movement_quantity() {
        assert!(validate_movement_quantity(5_000).is_ok());
        assert!(validate_movement_quantity(MAX_MOVEMENT_QUANTITY).is_ok());
        assert!(validate_movement_quantity(0).is_err());
        assert!(matches!(
            validate_movement_quantity(2_000_000_000_000_000),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+229 97123456").is_ok());
        assert!(validate_phone("+225 0712345678").is_ok());
        assert!(matches!(
            validate_phone(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("123").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(None).unwrap(), None);
        assert_eq!(validate_email(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_email(Some("jean.dupont@email.com")).unwrap().as_deref(),
            Some("jean.dupont@email.com")
        );
        assert!(validate_email(Some("jean.dupont")).is_err());
        assert!(validate_email(Some("@email.com")).is_err());
        assert!(validate_email(Some("jean@email")).is_err());
    }

    #[test]
    fn test_validate_prices_and_margin() {
        assert!(validate_price("purchase price", Money::zero()).is_ok());
        assert!(validate_price("purchase price", Money::from_xof(-1)).is_err());
        assert!(validate_price("purchase price", Money::from_xof(MAX_AMOUNT_XOF)).is_ok());
        assert!(validate_price("purchase price", Money::from_xof(MAX_AMOUNT_XOF + 1)).is_err());
        assert!(validate_price("purchase price", Money::from_xof(i64::MAX / 4)).is_err());
        assert!(validate_unit_price(Money::from_xof(MAX_UNIT_PRICE_XOF)).is_ok());
        assert!(validate_unit_price(Money::from_xof(MAX_UNIT_PRICE_XOF + 1)).is_err());
        assert!(validate_margin_bps(2_500).is_ok());
        assert!(validate_margin_bps(MAX_MARGIN_BPS + 1).is_err());
        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(-1).is_err());
        assert!(validate_stock_level(MAX_STOCK_LEVEL + 1).is_err());
    }

    #[test]
    fn test_validate_expense() {
        assert!(validate_expense_amount(Money::from_xof(150_000)).is_ok());
        assert!(validate_expense_amount(Money::zero()).is_err());
        assert!(validate_expense_amount(Money::from_xof(MAX_AMOUNT_XOF + 1)).is_err());
        assert!(validate_expense_category("Loyer").is_ok());
        assert!(validate_expense_category("").is_err());
    }

    #[test]
    fn test_validate_company_name() {
        assert!(validate_company_name("Auto Parts Store").is_ok());
        assert!(validate_company_name(" ").is_err());
    }
}
