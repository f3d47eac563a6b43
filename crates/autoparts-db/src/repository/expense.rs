//! # Expense Repository

use autoparts_core::finance::{ExpenseDraft, ExpenseFilter};
use autoparts_core::validation::validate_search_query;
use autoparts_core::Expense;
use chrono::NaiveDate;
use tracing::info;

use super::generate_id;
use crate::error::DbResult;
use crate::tables::SharedTables;

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    tables: SharedTables,
}

impl ExpenseRepository {
    pub fn new(tables: SharedTables) -> Self {
        ExpenseRepository { tables }
    }

    /// Expenses matching `filter`, newest first.
    pub async fn list(&self, mut filter: ExpenseFilter) -> DbResult<Vec<Expense>> {
        if let Some(search) = filter.search.take() {
            filter.search = Some(validate_search_query(&search)?);
        }
        let tables = self.tables.read().await;
        Ok(filter.apply(&tables.expenses).into_iter().cloned().collect())
    }

    /// Records an expense at the top of the list. The date defaults to
    /// `today`.
    pub async fn create(&self, draft: ExpenseDraft, today: NaiveDate) -> DbResult<Expense> {
        let expense = draft.into_expense(generate_id(), today)?;
        info!(
            id = %expense.id,
            category = %expense.category,
            amount = %expense.amount,
            "Expense recorded"
        );

        let mut tables = self.tables.write().await;
        tables.expenses.insert(0, expense.clone());
        Ok(expense)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::seeded;
    use autoparts_core::Money;

    #[tokio::test]
    async fn test_create_prepends() {
        let db = seeded().await;
        let today = NaiveDate::from_ymd_opt(2023, 11, 3).unwrap();
        let expense = db
            .expenses()
            .create(
                ExpenseDraft {
                    date: None,
                    category: "Transport".to_string(),
                    amount: Money::from_xof(12_500),
                    description: "Livraison Porto-Novo".to_string(),
                },
                today,
            )
            .await
            .unwrap();

        assert_eq!(expense.date, today);
        let all = db.expenses().list(ExpenseFilter::default()).await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], expense);
    }

    #[tokio::test]
    async fn test_invalid_expense_leaves_list_unchanged() {
        let db = seeded().await;
        let today = NaiveDate::from_ymd_opt(2023, 11, 3).unwrap();
        let result = db
            .expenses()
            .create(
                ExpenseDraft {
                    date: None,
                    category: "Loyer".to_string(),
                    amount: Money::from_xof(-1),
                    description: String::new(),
                },
                today,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(db.expenses().list(ExpenseFilter::default()).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_filter() {
        let db = seeded().await;
        let rent = db
            .expenses()
            .list(ExpenseFilter {
                search: None,
                category: Some("Loyer".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(rent.len(), 1);
        assert_eq!(rent[0].amount.xof(), 150_000);

        let fuel = db
            .expenses()
            .list(ExpenseFilter {
                search: Some("livraison".to_string()),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(fuel[0].category, "Carburant");
    }
}
