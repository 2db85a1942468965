use async_trait::async_trait;

use crate::errors::{CoreError, QuoteError};
use crate::models::insights::{
    InvestmentTips, InvestmentTipsRequest, SpendingSummary, SpendingSummaryRequest,
};
use crate::models::quote::Quote;

/// Abstraction over an external stock quote source.
///
/// Implementations perform one lookup per call and report failures with
/// a typed `QuoteError`. Caching and fallback to the last known price
/// happen above this trait.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the current quote for an uppercased ticker symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError>;
}

/// Abstraction over the generative-text service behind the insight cards.
///
/// The content is opaque to the library; only the input/output shapes are fixed.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn summarize_spending(
        &self,
        request: &SpendingSummaryRequest,
    ) -> Result<SpendingSummary, CoreError>;

    async fn investment_tips(
        &self,
        request: &InvestmentTipsRequest,
    ) -> Result<InvestmentTips, CoreError>;
}
