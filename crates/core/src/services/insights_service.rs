use chrono::NaiveDate;

use super::spending_service::SpendingService;
use crate::errors::CoreError;
use crate::models::insights::{
    InvestmentTips, InvestmentTipsRequest, PortfolioSummaryEntry, SpendingSummary,
    SpendingSummaryRequest,
};
use crate::models::position::PositionStore;
use crate::models::spending::Transaction;
use crate::providers::traits::InsightProvider;

/// Builds generative-insight requests from dashboard data and forwards them
/// to the configured provider.
///
/// Requests are built synchronously (callers may hold a store lock),
/// then sent without any lock held.
pub struct InsightsService {
    provider: Option<Box<dyn InsightProvider>>,
    spending: SpendingService,
}

impl InsightsService {
    pub fn new(provider: Option<Box<dyn InsightProvider>>) -> Self {
        Self {
            provider,
            spending: SpendingService::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// `[{symbol, shares, value}]` at last known prices.
    pub fn portfolio_summary_json(&self, store: &PositionStore) -> Result<String, CoreError> {
        let entries: Vec<PortfolioSummaryEntry> = store
            .iter()
            .map(|p| PortfolioSummaryEntry {
                symbol: p.symbol.clone(),
                shares: p.shares,
                value: p.market_value(),
            })
            .collect();
        serde_json::to_string(&entries)
            .map_err(|e| CoreError::Serialization(format!("Failed to encode portfolio summary: {e}")))
    }

    pub fn build_spending_request(
        &self,
        user_id: &str,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> Result<SpendingSummaryRequest, CoreError> {
        Ok(SpendingSummaryRequest {
            user_id: user_id.to_string(),
            monthly_spending_data: self.spending.monthly_spending_data(transactions, today)?,
        })
    }

    pub fn build_tips_request(
        &self,
        store: &PositionStore,
        financial_goals: &str,
        transactions: &[Transaction],
    ) -> Result<InvestmentTipsRequest, CoreError> {
        Ok(InvestmentTipsRequest {
            portfolio_summary: self.portfolio_summary_json(store)?,
            financial_goals: financial_goals.to_string(),
            spending_habits: self.spending.spending_habits_data(transactions)?,
        })
    }

    pub async fn spending_summary(
        &self,
        request: &SpendingSummaryRequest,
    ) -> Result<SpendingSummary, CoreError> {
        let provider = self.provider()?;
        tracing::info!(provider = provider.name(), user_id = %request.user_id, "requesting spending summary");
        provider.summarize_spending(request).await
    }

    pub async fn investment_tips(
        &self,
        request: &InvestmentTipsRequest,
    ) -> Result<InvestmentTips, CoreError> {
        let provider = self.provider()?;
        tracing::info!(provider = provider.name(), "requesting investment tips");
        provider.investment_tips(request).await
    }

    fn provider(&self) -> Result<&dyn InsightProvider, CoreError> {
        self.provider
            .as_deref()
            .ok_or_else(|| CoreError::NoProvider("generative insights".into()))
    }
}
