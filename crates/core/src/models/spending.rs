use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of money flow for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub category: String,
    /// Always positive; direction comes from `kind`
    pub amount: f64,
    pub description: String,
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// A spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub limit: f64,
    pub spent: f64,
}

/// Progress of a budget against its limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    /// limit - spent (negative once exceeded)
    pub remaining: f64,
    /// spent / limit * 100, 0 when the limit is 0
    pub percent_used: f64,
    pub exceeded: bool,
}

/// Total expenses in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExpense {
    pub category: String,
    pub amount: f64,
}

/// Total expenses in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExpense {
    pub year: i32,
    /// 1-based month number
    pub month: u32,
    pub amount: f64,
}

impl MonthlyExpense {
    /// Month label such as "2024-07".
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CashFlow {
    pub income: f64,
    pub expenses: f64,
    /// income - expenses
    pub net: f64,
}

/// Row of the spending data handed to the generative-text boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingRecord {
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl From<&Transaction> for SpendingRecord {
    fn from(t: &Transaction) -> Self {
        Self {
            category: t.category.clone(),
            amount: t.amount,
            date: t.date,
        }
    }
}
