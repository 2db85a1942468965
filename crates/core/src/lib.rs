pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    analytics::PortfolioSummary,
    insights::{InvestmentTips, SpendingSummary},
    position::{NewPosition, Position, PositionStore, SellOutcome, Valuation},
    seed,
    settings::{Settings, ALPHA_VANTAGE_KEY, OPENAI_KEY},
    spending::{Budget, BudgetStatus, CashFlow, CategoryExpense, MonthlyExpense, Transaction},
};
use providers::{
    alphavantage::AlphaVantageProvider,
    openai::OpenAiInsightProvider,
    traits::{InsightProvider, QuoteProvider},
};
use services::{
    insights_service::InsightsService,
    position_service::PositionService,
    quote_service::QuoteService,
    read_store,
    refresh_service::{RefreshOutcome, RefreshService},
    spending_service::SpendingService,
    write_store,
};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the finance-dashboard core library.
///
/// Holds the position store behind a lock so that buy/sell (synchronous,
/// short write locks) and quote refreshes (async, lock released while the
/// lookup is in flight) can interleave safely. Share it with `Arc` to drive
/// it from several tasks.
#[must_use]
pub struct FinanceDashboard {
    store: Arc<RwLock<PositionStore>>,
    settings: Settings,
    position_service: PositionService,
    refresh_service: RefreshService,
    insights_service: InsightsService,
    spending_service: SpendingService,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

impl std::fmt::Debug for FinanceDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceDashboard")
            .field("positions", &read_store(&self.store).len())
            .field("transactions", &self.transactions.len())
            .field("budgets", &self.budgets.len())
            .field("quote_provider", &self.refresh_service.quotes().provider_name())
            .field("insight_provider", &self.insights_service.provider_name())
            .finish()
    }
}

impl FinanceDashboard {
    /// Create an empty dashboard with providers configured from `settings`.
    pub fn new(settings: Settings) -> Self {
        let quote_provider = Self::default_quote_provider(&settings);
        let insight_provider = Self::default_insight_provider(&settings);
        Self::build(settings, quote_provider, insight_provider)
    }

    /// Create an empty dashboard with explicit providers (custom sources, tests).
    pub fn with_providers(
        settings: Settings,
        quote_provider: Box<dyn QuoteProvider>,
        insight_provider: Option<Box<dyn InsightProvider>>,
    ) -> Self {
        Self::build(settings, quote_provider, insight_provider)
    }

    /// Create a dashboard pre-filled with the demo positions, transactions and budgets.
    pub fn with_seed_data(settings: Settings) -> Result<Self, CoreError> {
        let mut dashboard = Self::new(settings);
        dashboard.load_seed_data()?;
        Ok(dashboard)
    }

    /// Add the demo positions, transactions and budgets.
    /// Positions go through `add_position`, so their prices start at cost.
    pub fn load_seed_data(&mut self) -> Result<Vec<Uuid>, CoreError> {
        let ids = {
            let mut store = write_store(&self.store);
            let mut staged = store.clone();
            let mut ids = Vec::new();
            for candidate in seed::seed_positions() {
                ids.push(self.position_service.add_position(&mut staged, candidate)?);
            }
            // All-or-nothing: commit only when every seed position was accepted.
            *store = staged;
            ids
        };
        self.transactions.extend(seed::seed_transactions());
        self.budgets.extend(seed::seed_budgets());
        Ok(ids)
    }

    // ── Positions ───────────────────────────────────────────────────

    /// Shared handle to the position store.
    pub fn store(&self) -> Arc<RwLock<PositionStore>> {
        Arc::clone(&self.store)
    }

    /// Snapshot of all positions in display order.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        read_store(&self.store).iter().cloned().collect()
    }

    #[must_use]
    pub fn position(&self, id: Uuid) -> Option<Position> {
        read_store(&self.store).get(id).cloned()
    }

    /// Look up a position by symbol (case-insensitive).
    #[must_use]
    pub fn find_by_symbol(&self, symbol: &str) -> Option<Position> {
        read_store(&self.store).find_by_symbol(symbol).cloned()
    }

    #[must_use]
    pub fn position_count(&self) -> usize {
        read_store(&self.store).len()
    }

    pub fn add_position(&self, candidate: NewPosition) -> Result<Uuid, CoreError> {
        let mut store = write_store(&self.store);
        self.position_service.add_position(&mut store, candidate)
    }

    pub fn buy(&self, id: Uuid, shares: f64, price_per_share: f64) -> Result<Position, CoreError> {
        let mut store = write_store(&self.store);
        self.position_service.buy(&mut store, id, shares, price_per_share)
    }

    pub fn sell(&self, id: Uuid, shares: f64) -> Result<SellOutcome, CoreError> {
        let mut store = write_store(&self.store);
        self.position_service.sell(&mut store, id, shares)
    }

    pub fn valuation(&self, id: Uuid, price_override: Option<f64>) -> Result<Valuation, CoreError> {
        let store = read_store(&self.store);
        self.position_service.valuation(&store, id, price_override)
    }

    #[must_use]
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        let store = read_store(&self.store);
        self.position_service.portfolio_summary(&store)
    }

    // ── Quotes ──────────────────────────────────────────────────────

    /// Refresh every position's price concurrently. Failed lookups keep
    /// the last known price and are reported in the returned outcomes.
    pub async fn refresh_all(&self) -> Vec<RefreshOutcome> {
        self.refresh_service.refresh_all(&self.store).await
    }

    /// Refresh one position's price on demand.
    pub async fn refresh_position(&self, id: Uuid) -> Result<RefreshOutcome, CoreError> {
        self.refresh_service.refresh_position(&self.store, id).await
    }

    // ── Spending & Budgets ──────────────────────────────────────────

    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), CoreError> {
        if !transaction.amount.is_finite() || transaction.amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Transaction amount must be a positive number, got {}",
                transaction.amount
            )));
        }
        self.transactions.push(transaction);
        Ok(())
    }

    #[must_use]
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    #[must_use]
    pub fn budget_statuses(&self) -> Vec<BudgetStatus> {
        self.spending_service.budget_statuses(&self.budgets)
    }

    #[must_use]
    pub fn expenses_by_category(&self) -> Vec<CategoryExpense> {
        self.spending_service.expenses_by_category(&self.transactions)
    }

    /// Spending trend: expense totals per month, oldest first.
    #[must_use]
    pub fn monthly_expenses(&self) -> Vec<MonthlyExpense> {
        self.spending_service.monthly_totals(&self.transactions)
    }

    #[must_use]
    pub fn cash_flow(&self) -> CashFlow {
        self.spending_service.cash_flow(&self.transactions)
    }

    // ── Generative Insights ─────────────────────────────────────────

    #[must_use]
    pub fn insights_available(&self) -> bool {
        self.insights_service.is_available()
    }

    /// Ask the insight provider for a summary of last month's spending
    /// (relative to `today`).
    pub async fn spending_summary(&self, today: NaiveDate) -> Result<SpendingSummary, CoreError> {
        let request = self.insights_service.build_spending_request(
            &self.settings.user_id,
            &self.transactions,
            today,
        )?;
        self.insights_service.spending_summary(&request).await
    }

    /// Ask the insight provider for investment tips on the current portfolio.
    pub async fn investment_tips(&self) -> Result<InvestmentTips, CoreError> {
        let request = {
            let store = read_store(&self.store);
            self.insights_service.build_tips_request(
                &store,
                &self.settings.financial_goals,
                &self.transactions,
            )?
        };
        self.insights_service.investment_tips(&request).await
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Set an API key for a provider ("alphavantage", "openai").
    /// Rebuilds the default providers so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: impl Into<String>, key: impl Into<String>) {
        self.settings.api_keys.insert(provider.into(), key.into());
        self.rebuild_providers();
    }

    /// Remove an API key for a provider. Returns `true` if a key was removed.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.settings.api_keys.remove(provider).is_some();
        if removed {
            self.rebuild_providers();
        }
        removed
    }

    // ── Internal ────────────────────────────────────────────────────

    fn rebuild_providers(&mut self) {
        let quotes = QuoteService::new(
            Self::default_quote_provider(&self.settings),
            self.settings.quote_cache_ttl_secs,
        );
        self.refresh_service = RefreshService::new(quotes);
        self.insights_service = InsightsService::new(Self::default_insight_provider(&self.settings));
    }

    fn default_quote_provider(settings: &Settings) -> Box<dyn QuoteProvider> {
        let key = settings.api_key(ALPHA_VANTAGE_KEY).map(str::to_string);
        if key.is_none() {
            tracing::warn!("no Alpha Vantage API key configured, prices will stay at their last known values");
        }
        Box::new(AlphaVantageProvider::new(key))
    }

    fn default_insight_provider(settings: &Settings) -> Option<Box<dyn InsightProvider>> {
        settings.api_key(OPENAI_KEY).map(|key| {
            Box::new(OpenAiInsightProvider::new(
                key.to_string(),
                settings.insight_model.clone(),
            )) as Box<dyn InsightProvider>
        })
    }

    fn build(
        settings: Settings,
        quote_provider: Box<dyn QuoteProvider>,
        insight_provider: Option<Box<dyn InsightProvider>>,
    ) -> Self {
        let quotes = QuoteService::new(quote_provider, settings.quote_cache_ttl_secs);

        Self {
            store: Arc::new(RwLock::new(PositionStore::new())),
            position_service: PositionService::new(),
            refresh_service: RefreshService::new(quotes),
            insights_service: InsightsService::new(insight_provider),
            spending_service: SpendingService::new(),
            transactions: Vec::new(),
            budgets: Vec::new(),
            settings,
        }
    }
}
