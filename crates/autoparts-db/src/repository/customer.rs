//! # Customer Repository
//!
//! Customer CRUD. Loyalty fields are only ever changed by checkout.

use autoparts_core::customer::{CustomerDraft, CustomerFilter};
use autoparts_core::{CoreError, Customer};
use tracing::info;

use super::generate_id;
use crate::error::DbResult;
use crate::tables::SharedTables;

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    tables: SharedTables,
}

impl CustomerRepository {
    pub fn new(tables: SharedTables) -> Self {
        CustomerRepository { tables }
    }

    pub async fn list(&self, filter: CustomerFilter) -> DbResult<Vec<Customer>> {
        let tables = self.tables.read().await;
        Ok(filter.apply(&tables.customers).into_iter().cloned().collect())
    }

    pub async fn get(&self, id: &str) -> DbResult<Customer> {
        let tables = self.tables.read().await;
        Ok(tables.customer(id)?.clone())
    }

    pub async fn create(&self, draft: CustomerDraft) -> DbResult<Customer> {
        let customer = draft.validate()?.into_customer(generate_id());
        info!(id = %customer.id, name = %customer.name, "Customer created");

        let mut tables = self.tables.write().await;
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    pub async fn update(&self, id: &str, draft: CustomerDraft) -> DbResult<Customer> {
        let draft = draft.validate()?;
        let mut tables = self.tables.write().await;
        let customer = tables.customer_mut(id)?;
        draft.apply_to(customer);
        Ok(customer.clone())
    }

    /// Removes a customer. Their documents keep the dangling id and render
    /// with a placeholder name.
    pub async fn delete(&self, id: &str) -> DbResult<Customer> {
        let mut tables = self.tables.write().await;
        let index = tables
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;
        let removed = tables.customers.remove(index);
        info!(id = %id, "Customer deleted");
        Ok(removed)
    }

    pub async fn count(&self) -> usize {
        self.tables.read().await.customers.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::seeded;
    use crate::DbError;

    fn draft(name: &str, phone: &str) -> CustomerDraft {
        CustomerDraft {
            name: name.to_string(),
            phone: phone.to_string(),
            email: Some("fatou.sow@email.com".to_string()),
            address: Some("Dakar, Sénégal".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_search() {
        let db = seeded().await;
        let created = db
            .customers()
            .create(draft("Fatou Sow", "+221 76543210"))
            .await
            .unwrap();
        assert_eq!(created.loyalty_points, 0);
        assert_eq!(db.customers().count().await, 4);

        let found = db
            .customers()
            .list(CustomerFilter {
                search: Some("fatou".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found, vec![created]);
    }

    #[tokio::test]
    async fn test_update_keeps_loyalty() {
        let db = seeded().await;
        let updated = db
            .customers()
            .update("2", draft("Marie Koné", "+225 0700000000"))
            .await
            .unwrap();

        assert_eq!(updated.loyalty_points, 200);
        assert_eq!(updated.total_purchases, 5);
        assert_eq!(updated.phone, "+225 0700000000");
    }

    #[tokio::test]
    async fn test_validation_and_missing() {
        let db = seeded().await;
        assert!(db.customers().create(draft("", "+221 76543210")).await.is_err());
        assert!(matches!(
            db.customers().update("9", draft("X", "+221 76543210")).await,
            Err(DbError::Core(CoreError::CustomerNotFound(_)))
        ));

        db.customers().delete("3").await.unwrap();
        assert!(db.customers().get("3").await.is_err());
    }
}
