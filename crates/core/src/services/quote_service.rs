use chrono::{Duration, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::QuoteError;
use crate::models::quote::{CachedQuote, Quote, QuoteCache};
use crate::providers::traits::QuoteProvider;

/// Upper bound for the cache TTL (one year) so the duration never overflows.
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Best-effort price lookup with a short-lived per-symbol cache.
///
/// Cache strategy:
/// - A quote fetched less than `ttl` ago is returned without an upstream call.
/// - Only successful quotes are cached; a failure is retried on the next call.
/// - The cache lock is never held across an await, so lookups for different
///   symbols run fully concurrently.
pub struct QuoteService {
    provider: Box<dyn QuoteProvider>,
    cache: Mutex<QuoteCache>,
    ttl: Duration,
}

impl QuoteService {
    pub fn new(provider: Box<dyn QuoteProvider>, ttl_secs: u64) -> Self {
        let secs = i64::try_from(ttl_secs.min(MAX_TTL_SECS)).unwrap_or(0);
        Self {
            provider,
            cache: Mutex::new(QuoteCache::new()),
            ttl: Duration::seconds(secs),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current price for `symbol` (case-insensitive).
    pub async fn fetch_price(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(QuoteError::InvalidSymbol {
                symbol,
                message: "symbol is empty".into(),
            });
        }

        let cached = self
            .lock_cache()
            .get_fresh(&symbol, Utc::now(), self.ttl)
            .cloned();
        if let Some(quote) = cached {
            tracing::debug!(%symbol, price = quote.price, "quote served from cache");
            return Ok(quote);
        }

        let mut quote = self.provider.fetch_quote(&symbol).await?;
        if quote.symbol != symbol {
            tracing::debug!(requested = %symbol, reported = %quote.symbol, "quote source reported a different symbol");
            quote.symbol = symbol.clone();
        }
        tracing::debug!(
            %symbol,
            price = quote.price,
            provider = self.provider.name(),
            "quote fetched"
        );
        self.lock_cache().insert(&symbol, quote.clone(), Utc::now());
        Ok(quote)
    }

    /// Last successful quote for `symbol`, regardless of age.
    pub fn cached_quote(&self, symbol: &str) -> Option<CachedQuote> {
        self.lock_cache().get(symbol).cloned()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, QuoteCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
