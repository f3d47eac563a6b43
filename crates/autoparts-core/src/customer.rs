//! # Customers
//!
//! Customer form payload, list filter and name resolution.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::Customer;
use crate::validation::{validate_customer_name, validate_email, validate_phone};

pub const UNKNOWN_CUSTOMER: &str = "Unknown customer";
pub const WALK_IN_CUSTOMER: &str = "Walk-in customer";

/// Customer form payload. Loyalty fields are never set from a form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerDraft {
    /// Validates name and phone (both required) and an optional email.
    pub fn validate(self) -> CoreResult<CustomerDraft> {
        Ok(CustomerDraft {
            name: validate_customer_name(&self.name)?,
            phone: validate_phone(&self.phone)?,
            email: validate_email(self.email.as_deref())?,
            address: self
                .address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        })
    }

    /// A new customer with no purchase history.
    pub fn into_customer(self, id: String) -> Customer {
        Customer {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            loyalty_points: 0,
            last_purchase: None,
            total_purchases: 0,
        }
    }

    /// Overwrites contact details, keeping loyalty history.
    pub fn apply_to(self, customer: &mut Customer) {
        customer.name = self.name;
        customer.phone = self.phone;
        customer.email = self.email;
        customer.address = self.address;
    }
}

/// Customer list query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerFilter {
    /// Name or email (case-insensitive), or phone substring.
    pub search: Option<String>,
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        let needle = match self.search.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(needle) => needle,
        };
        let lowered = needle.to_lowercase();
        customer.name.to_lowercase().contains(&lowered)
            || customer.phone.contains(needle)
            || customer
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&lowered))
    }

    pub fn apply<'a>(&self, customers: &'a [Customer]) -> Vec<&'a Customer> {
        customers.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Display name for a document's customer reference.
pub fn customer_name<'a>(customers: &'a [Customer], id: Option<&str>) -> &'a str {
    match id {
        None => WALK_IN_CUSTOMER,
        Some(id) => customers
            .iter()
            .find(|c| c.id == id)
            .map_or(UNKNOWN_CUSTOMER, |c| c.name.as_str()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
