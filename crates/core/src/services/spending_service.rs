use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use crate::errors::CoreError;
use crate::models::spending::{
    Budget, BudgetStatus, CashFlow, CategoryExpense, MonthlyExpense, SpendingRecord, Transaction,
    TransactionKind,
};

/// Derived spending figures over in-memory transactions and budgets.
pub struct SpendingService;

impl SpendingService {
    pub fn new() -> Self {
        Self
    }

    /// Expense totals per category, largest first (ties by category name).
    pub fn expenses_by_category(&self, transactions: &[Transaction]) -> Vec<CategoryExpense> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for t in transactions.iter().filter(|t| t.is_expense()) {
            *totals.entry(t.category.as_str()).or_insert(0.0) += t.amount;
        }

        let mut expenses: Vec<CategoryExpense> = totals
            .into_iter()
            .map(|(category, amount)| CategoryExpense {
                category: category.to_string(),
                amount,
            })
            .collect();
        expenses.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        expenses
    }

    /// Expense totals per calendar month, oldest first. Months without
    /// expenses are left out.
    pub fn monthly_totals(&self, transactions: &[Transaction]) -> Vec<MonthlyExpense> {
        let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for t in transactions.iter().filter(|t| t.is_expense()) {
            *totals.entry((t.date.year(), t.date.month())).or_insert(0.0) += t.amount;
        }

        totals
            .into_iter()
            .map(|((year, month), amount)| MonthlyExpense {
                year,
                month,
                amount,
            })
            .collect()
    }

    pub fn cash_flow(&self, transactions: &[Transaction]) -> CashFlow {
        let (income, expenses) =
            transactions
                .iter()
                .fold((0.0, 0.0), |(income, expenses), t| match t.kind {
                    TransactionKind::Income => (income + t.amount, expenses),
                    TransactionKind::Expense => (income, expenses + t.amount),
                });
        CashFlow {
            income,
            expenses,
            net: income - expenses,
        }
    }

    pub fn budget_status(&self, budget: &Budget) -> BudgetStatus {
        let percent_used = if budget.limit > 0.0 {
            budget.spent / budget.limit * 100.0
        } else {
            0.0
        };
        BudgetStatus {
            category: budget.category.clone(),
            limit: budget.limit,
            spent: budget.spent,
            remaining: budget.limit - budget.spent,
            percent_used,
            exceeded: budget.spent > budget.limit,
        }
    }

    pub fn budget_statuses(&self, budgets: &[Budget]) -> Vec<BudgetStatus> {
        budgets.iter().map(|b| self.budget_status(b)).collect()
    }

    /// Expenses dated in the calendar month before `today`.
    pub fn previous_month_expenses<'a>(
        &self,
        transactions: &'a [Transaction],
        today: NaiveDate,
    ) -> Vec<&'a Transaction> {
        let Some(prev) = today.with_day(1).and_then(|first| first.pred_opt()) else {
            return Vec::new();
        };
        transactions
            .iter()
            .filter(|t| t.is_expense() && t.date.year() == prev.year() && t.date.month() == prev.month())
            .collect()
    }

    /// JSON array of `{category, amount, date}` for last month's expenses.
    /// Falls back to every expense when last month has none.
    pub fn monthly_spending_data(
        &self,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> Result<String, CoreError> {
        let mut selected = self.previous_month_expenses(transactions, today);
        if selected.is_empty() {
            selected = transactions.iter().filter(|t| t.is_expense()).collect();
        }
        Self::encode(&selected)
    }

    /// JSON array of `{category, amount, date}` for every expense.
    pub fn spending_habits_data(&self, transactions: &[Transaction]) -> Result<String, CoreError> {
        let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
        Self::encode(&expenses)
    }

    fn encode(transactions: &[&Transaction]) -> Result<String, CoreError> {
        let records: Vec<SpendingRecord> = transactions.iter().map(|t| SpendingRecord::from(*t)).collect();
        serde_json::to_string(&records)
            .map_err(|e| CoreError::Serialization(format!("Failed to encode spending data: {e}")))
    }
}

impl Default for SpendingService {
    fn default() -> Self {
        Self::new()
    }
}
