use serde::{Deserialize, Serialize};

/// Input of the spending-summary generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummaryRequest {
    pub user_id: String,
    /// JSON-encoded array of `{category, amount, date}`
    pub monthly_spending_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub summary: String,
}

/// Input of the investment-tips generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTipsRequest {
    pub portfolio_summary: String,
    pub financial_goals: String,
    pub spending_habits: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTips {
    pub investment_tips: String,
    pub risk_assessment: String,
    pub recommendations_disclaimer: String,
}

/// One row of the portfolio summary sent to the investment-tips generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummaryEntry {
    pub symbol: String,
    pub shares: f64,
    pub value: f64,
}
