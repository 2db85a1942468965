//! Static demo data the dashboard starts from.

use chrono::NaiveDate;

use super::position::NewPosition;
use super::spending::{Budget, Transaction, TransactionKind};

pub const DEFAULT_FINANCIAL_GOALS: &str = "Looking for long-term growth, moderate risk tolerance. \
Planning for retirement in 20 years and a down payment on a house in 5 years.";

pub fn seed_positions() -> Vec<NewPosition> {
    vec![
        NewPosition::new("AAPL", "Apple Inc.", 10.0, 150.00),
        NewPosition::new("MSFT", "Microsoft Corp.", 5.0, 300.00),
        NewPosition::new("GOOGL", "Alphabet Inc.", 2.0, 2500.00),
        NewPosition::new("TSLA", "Tesla Inc.", 8.0, 200.00),
    ]
}

pub fn seed_transactions() -> Vec<Transaction> {
    let rows: [(&str, (i32, u32, u32), &str, f64, &str, TransactionKind); 8] = [
        ("1", (2024, 7, 1), "Groceries", 75.50, "Weekly shopping", TransactionKind::Expense),
        ("2", (2024, 7, 2), "Salary", 2500.00, "Monthly salary", TransactionKind::Income),
        ("3", (2024, 7, 3), "Dining Out", 45.00, "Dinner with friends", TransactionKind::Expense),
        ("4", (2024, 7, 5), "Utilities", 120.00, "Electricity bill", TransactionKind::Expense),
        ("5", (2024, 7, 10), "Transport", 30.00, "Metro card top-up", TransactionKind::Expense),
        ("6", (2024, 7, 15), "Entertainment", 60.00, "Movie tickets", TransactionKind::Expense),
        ("7", (2024, 6, 1), "Groceries", 80.00, "Monthly shopping", TransactionKind::Expense),
        ("8", (2024, 6, 15), "Dining Out", 55.00, "Lunch meeting", TransactionKind::Expense),
    ];

    rows.into_iter()
        .filter_map(|(id, (y, m, d), category, amount, description, kind)| {
            Some(Transaction {
                id: id.to_string(),
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                category: category.to_string(),
                amount,
                description: description.to_string(),
                kind,
            })
        })
        .collect()
}

pub fn seed_budgets() -> Vec<Budget> {
    [
        ("1", "Groceries", 300.0, 150.50),
        ("2", "Dining Out", 150.0, 100.00),
        ("3", "Entertainment", 100.0, 60.00),
        ("4", "Transport", 80.0, 95.00),
    ]
    .into_iter()
    .map(|(id, category, limit, spent)| Budget {
        id: id.to_string(),
        category: category.to_string(),
        limit,
        spent,
    })
    .collect()
}
