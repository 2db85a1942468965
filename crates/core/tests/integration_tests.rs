// ═══════════════════════════════════════════════════════════════════
// Integration Tests — FinanceDashboard facade: seeding, trading,
// concurrent refresh, stale-but-present prices, insights
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use finance_dashboard_core::errors::{CoreError, QuoteError};
use finance_dashboard_core::models::position::{NewPosition, SellOutcome};
use finance_dashboard_core::models::quote::Quote;
use finance_dashboard_core::models::settings::{Settings, ALPHA_VANTAGE_KEY};
use finance_dashboard_core::providers::traits::QuoteProvider;
use finance_dashboard_core::services::refresh_service::RefreshOutcome;
use finance_dashboard_core::FinanceDashboard;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ═══════════════════════════════════════════════════════════════════
// Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// Fixed result per symbol.
struct MockQuoteProvider {
    results: HashMap<String, Result<Quote, QuoteError>>,
    calls: Arc<AtomicUsize>,
}

impl MockQuoteProvider {
    fn seeded() -> Self {
        let mut results = HashMap::new();
        results.insert("AAPL".to_string(), Ok(Quote::new("AAPL", 190.0).with_change(1.5)));
        results.insert(
            "MSFT".to_string(),
            Err(QuoteError::RateLimited {
                symbol: "MSFT".into(),
            }),
        );
        results.insert(
            "GOOGL".to_string(),
            Err(QuoteError::InvalidSymbol {
                symbol: "GOOGL".into(),
                message: "no quote data returned".into(),
            }),
        );
        results.insert(
            "TSLA".to_string(),
            Err(QuoteError::Unavailable {
                symbol: "TSLA".into(),
                message: "connection reset".into(),
            }),
        );
        Self {
            results,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Ok(Quote::new(symbol, 100.0)))
    }
}

/// Succeeds on the first lookup, rate-limited afterwards.
#[derive(Default)]
struct FlakyQuoteProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl QuoteProvider for FlakyQuoteProvider {
    fn name(&self) -> &str {
        "Flaky"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(Quote::new(symbol, 190.0))
        } else {
            Err(QuoteError::RateLimited {
                symbol: symbol.to_string(),
            })
        }
    }
}

/// Holds lookups for `slow_symbol` until the test releases the gate;
/// every other symbol answers immediately.
struct GatedQuoteProvider {
    slow_symbol: String,
    started: Arc<Notify>,
    gate: Arc<Notify>,
    price: f64,
}

#[async_trait]
impl QuoteProvider for GatedQuoteProvider {
    fn name(&self) -> &str {
        "Gated"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        if symbol == self.slow_symbol {
            self.started.notify_one();
            self.gate.notified().await;
        }
        Ok(Quote::new(symbol, self.price))
    }
}

fn gated(slow_symbol: &str, price: f64) -> (GatedQuoteProvider, Arc<Notify>, Arc<Notify>) {
    let started = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let provider = GatedQuoteProvider {
        slow_symbol: slow_symbol.to_string(),
        started: Arc::clone(&started),
        gate: Arc::clone(&gate),
        price,
    };
    (provider, started, gate)
}

fn seeded_dashboard(provider: impl QuoteProvider + 'static) -> FinanceDashboard {
    let mut dashboard = FinanceDashboard::with_providers(Settings::default(), Box::new(provider), None);
    dashboard.load_seed_data().unwrap();
    dashboard
}

// ═══════════════════════════════════════════════════════════════════
// Seeding & trading
// ═══════════════════════════════════════════════════════════════════

#[test]
fn seed_positions_start_at_cost() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    let positions = dashboard.positions();
    assert_eq!(positions.len(), 4);
    assert!(positions.iter().all(|p| p.last_price == p.avg_cost));
    assert_eq!(dashboard.transactions().len(), 8);
    assert_eq!(dashboard.budgets().len(), 4);
}

#[test]
fn seeding_twice_is_rejected_atomically() {
    let mut dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    let err = dashboard.load_seed_data().unwrap_err();
    assert!(matches!(err, CoreError::DuplicateSymbol(_)));
    assert_eq!(dashboard.position_count(), 4);
    assert_eq!(dashboard.transactions().len(), 8);
}

#[test]
fn buy_and_sell_through_facade() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    let aapl = dashboard.find_by_symbol("aapl").unwrap();

    let bought = dashboard.buy(aapl.id, 5.0, 175.50).unwrap();
    assert!(approx(bought.shares, 15.0));
    assert!(approx(bought.avg_cost, 158.50));

    let tsla = dashboard.find_by_symbol("TSLA").unwrap();
    assert!(matches!(
        dashboard.sell(tsla.id, 9.0),
        Err(CoreError::InsufficientShares { .. })
    ));
    assert_eq!(dashboard.position(tsla.id).unwrap().shares, 8.0);

    assert!(matches!(
        dashboard.sell(tsla.id, 8.0).unwrap(),
        SellOutcome::Closed { .. }
    ));
    assert!(dashboard.position(tsla.id).is_none());
    assert_eq!(dashboard.position_count(), 3);
}

#[test]
fn duplicate_add_leaves_store_unchanged() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    let err = dashboard
        .add_position(NewPosition::new("msft", "Microsoft again", 1.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateSymbol(_)));
    assert_eq!(dashboard.position_count(), 4);

    dashboard
        .add_position(NewPosition::new("nvda", "NVIDIA Corp.", 3.0, 120.0))
        .unwrap();
    assert_eq!(dashboard.position_count(), 5);
    assert_eq!(dashboard.positions().last().unwrap().symbol, "NVDA");
}

// ═══════════════════════════════════════════════════════════════════
// Refresh
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn refresh_failures_keep_last_price_and_stay_isolated() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    let outcomes = dashboard.refresh_all().await;
    assert_eq!(outcomes.len(), 4);

    let by_symbol: HashMap<&str, &RefreshOutcome> =
        outcomes.iter().map(|o| (o.symbol(), o)).collect();
    assert!(by_symbol["AAPL"].is_updated());
    assert!(by_symbol["AAPL"].warning().is_none());
    for symbol in ["MSFT", "GOOGL", "TSLA"] {
        let outcome = by_symbol[symbol];
        assert!(matches!(outcome, RefreshOutcome::Failed { .. }));
        assert!(outcome.warning().unwrap().contains("Using last known price"));
    }

    let aapl = dashboard.find_by_symbol("AAPL").unwrap();
    assert_eq!(aapl.last_price, 190.0);
    assert_eq!(aapl.day_change_pct, Some(1.5));
    assert!(aapl.last_refreshed.is_some());

    assert_eq!(dashboard.find_by_symbol("MSFT").unwrap().last_price, 300.0);
    assert_eq!(dashboard.find_by_symbol("GOOGL").unwrap().last_price, 2500.0);
    assert_eq!(dashboard.find_by_symbol("TSLA").unwrap().last_price, 200.0);
}

#[tokio::test]
async fn failed_refresh_keeps_previously_refreshed_price() {
    let mut settings = Settings::default();
    settings.quote_cache_ttl_secs = 0;
    let dashboard = FinanceDashboard::with_providers(settings, Box::new(FlakyQuoteProvider::default()), None);
    let id = dashboard
        .add_position(NewPosition::new("AAPL", "Apple Inc.", 10.0, 150.0))
        .unwrap();

    assert!(dashboard.refresh_position(id).await.unwrap().is_updated());
    assert_eq!(dashboard.position(id).unwrap().last_price, 190.0);

    let outcome = dashboard.refresh_position(id).await.unwrap();
    assert!(matches!(
        outcome,
        RefreshOutcome::Failed {
            error: QuoteError::RateLimited { .. },
            ..
        }
    ));
    assert_eq!(dashboard.position(id).unwrap().last_price, 190.0);
}

#[tokio::test]
async fn repeated_refresh_within_ttl_hits_cache() {
    let provider = MockQuoteProvider::seeded();
    let calls = Arc::clone(&provider.calls);
    let dashboard = seeded_dashboard(provider);
    let aapl = dashboard.find_by_symbol("AAPL").unwrap().id;

    dashboard.refresh_position(aapl).await.unwrap();
    dashboard.refresh_position(aapl).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn single_symbol_refresh_leaves_others_alone() {
    let provider = MockQuoteProvider::seeded();
    let calls = Arc::clone(&provider.calls);
    let dashboard = seeded_dashboard(provider);
    let aapl = dashboard.find_by_symbol("aapl").unwrap().id;

    let outcome = dashboard.refresh_position(aapl).await.unwrap();
    assert!(matches!(outcome, RefreshOutcome::Updated { ref quote, .. } if quote.price == 190.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(dashboard
        .positions()
        .iter()
        .filter(|p| p.id != aapl)
        .all(|p| p.last_refreshed.is_none()));
}

#[tokio::test]
async fn refresh_unknown_position_is_not_found() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    let err = dashboard.refresh_position(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CoreError::PositionNotFound(_)));
}

#[tokio::test]
async fn late_quote_for_removed_position_is_discarded() {
    let (provider, started, gate) = gated("TSLA", 250.0);
    let dashboard = Arc::new(seeded_dashboard(provider));
    let tsla = dashboard.find_by_symbol("TSLA").unwrap().id;

    let background = Arc::clone(&dashboard);
    let handle = tokio::spawn(async move { background.refresh_position(tsla).await });

    started.notified().await;
    dashboard.sell(tsla, 8.0).unwrap();
    gate.notify_one();

    let outcome = handle.await.unwrap().unwrap();
    assert!(matches!(outcome, RefreshOutcome::Discarded { ref symbol, .. } if symbol == "TSLA"));
    assert!(dashboard.find_by_symbol("TSLA").is_none());
    assert_eq!(dashboard.position_count(), 3);
}

#[tokio::test]
async fn buy_during_refresh_keeps_both_writes() {
    let (provider, started, gate) = gated("AAPL", 190.0);
    let dashboard = Arc::new(seeded_dashboard(provider));
    let aapl = dashboard.find_by_symbol("AAPL").unwrap().id;

    let background = Arc::clone(&dashboard);
    let handle = tokio::spawn(async move { background.refresh_position(aapl).await });

    started.notified().await;
    dashboard.buy(aapl, 5.0, 175.50).unwrap();
    gate.notify_one();

    assert!(handle.await.unwrap().unwrap().is_updated());
    let p = dashboard.position(aapl).unwrap();
    assert!(approx(p.shares, 15.0));
    assert!(approx(p.avg_cost, 158.50));
    assert_eq!(p.last_price, 190.0);
}

#[tokio::test]
async fn slow_refresh_does_not_block_others() {
    let (provider, started, gate) = gated("GOOGL", 2600.0);
    let dashboard = Arc::new(seeded_dashboard(provider));
    let googl = dashboard.find_by_symbol("GOOGL").unwrap().id;
    let msft = dashboard.find_by_symbol("MSFT").unwrap().id;

    let background = Arc::clone(&dashboard);
    let slow = tokio::spawn(async move { background.refresh_position(googl).await });
    started.notified().await;

    assert!(dashboard.refresh_position(msft).await.unwrap().is_updated());
    assert_eq!(dashboard.position(msft).unwrap().last_price, 2600.0);
    assert_eq!(dashboard.position(googl).unwrap().last_price, 2500.0);

    gate.notify_one();
    assert!(slow.await.unwrap().unwrap().is_updated());
    assert_eq!(dashboard.position(googl).unwrap().last_price, 2600.0);
}

#[tokio::test]
async fn without_api_key_every_refresh_is_misconfigured() {
    let dashboard = FinanceDashboard::with_seed_data(Settings::default()).unwrap();
    let outcomes = dashboard.refresh_all().await;
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| matches!(
        o,
        RefreshOutcome::Failed {
            error: QuoteError::Misconfigured(_),
            ..
        }
    )));
    assert!(dashboard.positions().iter().all(|p| p.last_price == p.avg_cost));
}

// ═══════════════════════════════════════════════════════════════════
// Summary, spending, insights, settings
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn portfolio_summary_after_refresh() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    dashboard.refresh_all().await;
    let summary = dashboard.portfolio_summary();

    // AAPL 10×190 + MSFT 5×300 + GOOGL 2×2500 + TSLA 8×200
    assert!(approx(summary.total_value, 1900.0 + 1500.0 + 5000.0 + 1600.0));
    assert!(approx(summary.total_cost, 1500.0 + 1500.0 + 5000.0 + 1600.0));
    assert!(approx(summary.total_gain_loss, 400.0));
    let alloc: f64 = summary.holdings.iter().map(|h| h.allocation_pct).sum();
    assert!(approx(alloc, 100.0));
}

#[test]
fn spending_views() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    assert_eq!(dashboard.expenses_by_category()[0].category, "Groceries");
    assert!(approx(dashboard.cash_flow().net, 2034.5));
    assert_eq!(
        dashboard
            .budget_statuses()
            .iter()
            .filter(|s| s.exceeded)
            .count(),
        1
    );
}

#[test]
fn monthly_expenses_through_facade() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    let months = dashboard.monthly_expenses();
    assert_eq!(months.len(), 2);
    assert_eq!(months[1].label(), "2024-07");
    let total: f64 = months.iter().map(|m| m.amount).sum();
    assert!(approx(total, dashboard.cash_flow().expenses));
}

#[test]
fn add_transaction_validates_amount() {
    use finance_dashboard_core::models::spending::{Transaction, TransactionKind};

    let mut dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    let tx = |amount: f64| Transaction {
        id: "9".into(),
        date: NaiveDate::from_ymd_opt(2024, 7, 20).unwrap(),
        category: "Groceries".into(),
        amount,
        description: "Top-up".into(),
        kind: TransactionKind::Expense,
    };
    assert!(matches!(
        dashboard.add_transaction(tx(-3.0)),
        Err(CoreError::ValidationError(_))
    ));
    dashboard.add_transaction(tx(20.0)).unwrap();
    assert_eq!(dashboard.transactions().len(), 9);
}

#[tokio::test]
async fn insights_without_provider() {
    let dashboard = seeded_dashboard(MockQuoteProvider::seeded());
    assert!(!dashboard.insights_available());
    assert!(matches!(
        dashboard.investment_tips().await,
        Err(CoreError::NoProvider(_))
    ));
    let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    assert!(matches!(
        dashboard.spending_summary(today).await,
        Err(CoreError::NoProvider(_))
    ));
}

#[test]
fn api_keys_can_be_set_and_removed() {
    let mut dashboard = FinanceDashboard::new(Settings::default());
    dashboard.set_api_key("openai", "sk-test");
    assert!(dashboard.insights_available());
    dashboard.set_api_key(ALPHA_VANTAGE_KEY, "demo");
    assert_eq!(dashboard.settings().api_key(ALPHA_VANTAGE_KEY), Some("demo"));

    assert!(dashboard.remove_api_key("openai"));
    assert!(!dashboard.insights_available());
    assert!(!dashboard.remove_api_key("openai"));
}
