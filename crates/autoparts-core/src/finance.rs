//! # Finance
//!
//! Expenses, their category breakdown and monthly profit.
//!
//! ```text
//! monthly sales (sale invoices) ──┐
//!                                 ├──► profit = sales − expenses, per month
//! monthly expenses ───────────────┘
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::analytics::{monthly_sales, MONTH_LABELS};
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Expense, Invoice};
use crate::validation::{validate_expense_amount, validate_expense_category};

// =============================================================================
// Expense Draft
// =============================================================================

/// Expense form payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    /// Defaults to today.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub category: String,
    pub amount: Money,
    #[serde(default)]
    pub description: String,
}

impl ExpenseDraft {
    /// Validates the draft and builds the expense.
    ///
    /// Category and a positive amount are required.
    pub fn into_expense(self, id: String, today: NaiveDate) -> CoreResult<Expense> {
        let category = validate_expense_category(&self.category)?;
        validate_expense_amount(self.amount)?;

        Ok(Expense {
            id,
            date: self.date.unwrap_or(today),
            category,
            amount: self.amount,
            description: self.description.trim().to_string(),
        })
    }
}

// =============================================================================
// Expense Filter
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of category or description.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                expense.category.to_lowercase().contains(&needle)
                    || expense.description.to_lowercase().contains(&needle)
            }
        };
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| expense.category == category);
        search_ok && category_ok
    }

    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|e| self.matches(e)).collect()
    }
}

// =============================================================================
// Summaries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryExpense {
    pub category: String,
    pub amount: Money,
    /// Share of all expenses in basis points.
    pub share_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProfit {
    /// 1 = January.
    pub month: u32,
    pub label: String,
    pub sales: Money,
    pub expenses: Money,
    pub profit: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub year: i32,
    /// All expenses on record, every year.
    pub total_expenses: Money,
    pub by_category: Vec<CategoryExpense>,
    pub monthly: Vec<MonthlyProfit>,
}

/// Totals per category, in order of first appearance.
pub fn expenses_by_category(expenses: &[Expense]) -> Vec<CategoryExpense> {
    let total: Money = expenses.iter().map(|e| e.amount).sum();
    let mut breakdown: Vec<CategoryExpense> = Vec::new();

    for expense in expenses {
        match breakdown.iter_mut().find(|c| c.category == expense.category) {
            Some(entry) => entry.amount += expense.amount,
            None => breakdown.push(CategoryExpense {
                category: expense.category.clone(),
                amount: expense.amount,
                share_bps: 0,
            }),
        }
    }
    for entry in &mut breakdown {
        entry.share_bps = Money::share_bps(entry.amount, total);
    }
    breakdown
}

/// Expenses per calendar month of `year`, January first.
pub fn monthly_expenses(expenses: &[Expense], year: i32) -> [Money; 12] {
    let mut months = [Money::zero(); 12];
    for expense in expenses.iter().filter(|e| e.date.year() == year) {
        months[expense.date.month0() as usize] += expense.amount;
    }
    months
}

pub fn finance_summary(invoices: &[Invoice], expenses: &[Expense], year: i32) -> FinanceSummary {
    let sales = monthly_sales(invoices, year);
    let spent = monthly_expenses(expenses, year);

    let monthly = sales
        .iter()
        .zip(spent.iter())
        .enumerate()
        .map(|(i, (sale, spent))| MonthlyProfit {
            month: i as u32 + 1,
            label: MONTH_LABELS[i].to_string(),
            sales: sale.amount,
            expenses: *spent,
            profit: sale.amount - *spent,
        })
        .collect();

    FinanceSummary {
        year,
        total_expenses: expenses.iter().map(|e| e.amount).sum(),
        by_category: expenses_by_category(expenses),
        monthly,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentType;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    fn expense(id: &str, category: &str, amount: i64, d: NaiveDate, description: &str) -> Expense {
        Expense {
            id: id.to_string(),
            date: d,
            category: category.to_string(),
            amount: Money::from_xof(amount),
            description: description.to_string(),
        }
    }

    fn october() -> Vec<Expense> {
        vec![
            expense("1", "Loyer", 150_000, date(10, 1), "Loyer mensuel du magasin"),
            expense("2", "Electricité", 45_000, date(10, 5), "Facture d'électricité"),
            expense("3", "Personnel", 250_000, date(10, 10), "Salaires"),
            expense("4", "Internet", 30_000, date(10, 15), "Abonnement internet"),
            expense("5", "Carburant", 35_000, date(10, 20), "Carburant pour livraison"),
        ]
    }

    #[test]
    fn test_draft_requires_category_and_positive_amount() {
        let today = date(11, 1);
        let draft = ExpenseDraft {
            date: None,
            category: "Loyer".to_string(),
            amount: Money::from_xof(150_000),
            description: " Novembre ".to_string(),
        };
        let expense = draft.into_expense("e-1".to_string(), today).unwrap();
        assert_eq!(expense.date, today);
        assert_eq!(expense.description, "Novembre");

        let no_category = ExpenseDraft {
            date: None,
            category: " ".to_string(),
            amount: Money::from_xof(10),
            description: String::new(),
        };
        assert!(no_category.into_expense("e-2".to_string(), today).is_err());

        let zero = ExpenseDraft {
            date: Some(today),
            category: "Internet".to_string(),
            amount: Money::zero(),
            description: String::new(),
        };
        assert!(zero.into_expense("e-3".to_string(), today).is_err());
    }

    #[test]
    fn test_filter() {
        let expenses = october();
        let by_text = ExpenseFilter {
            search: Some("SALAIRE".to_string()),
            category: None,
        };
        assert_eq!(by_text.apply(&expenses).len(), 1);

        let by_category = ExpenseFilter {
            search: None,
            category: Some("Loyer".to_string()),
        };
        assert_eq!(by_category.apply(&expenses)[0].id, "1");

        let both = ExpenseFilter {
            search: Some("internet".to_string()),
            category: Some("Loyer".to_string()),
        };
        assert!(both.apply(&expenses).is_empty());
    }

    #[test]
    fn test_breakdown_shares() {
        let breakdown = expenses_by_category(&october());
        assert_eq!(breakdown.len(), 5);
        assert_eq!(breakdown[2].category, "Personnel");
        assert_eq!(breakdown[2].amount.xof(), 250_000);
        // 250 000 / 510 000
        assert_eq!(breakdown[2].share_bps, 4902);
    }

    #[test]
    fn test_monthly_profit() {
        let sale = Invoice {
            id: "INV-002".to_string(),
            date: date(10, 26),
            customer_id: None,
            items: vec![],
            subtotal: Money::from_xof(56_250),
            tax: Money::from_xof(10_125),
            total: Money::from_xof(66_375),
            paid: true,
            document_type: DocumentType::Sale,
            created_by: "2".to_string(),
            payment_method: None,
            converted_from: None,
            converted_to: None,
        };

        let summary = finance_summary(&[sale], &october(), 2023);
        let oct = &summary.monthly[9];

        assert_eq!(summary.total_expenses.xof(), 510_000);
        assert_eq!(oct.label, "Oct");
        assert_eq!(oct.sales.xof(), 66_375);
        assert_eq!(oct.expenses.xof(), 510_000);
        assert_eq!(oct.profit.xof(), 66_375 - 510_000);
        assert!(summary.monthly[0].profit.is_zero());

        let other_year = finance_summary(&[], &october(), 2024);
        assert!(other_year.monthly.iter().all(|m| m.expenses.is_zero()));
    }
}
