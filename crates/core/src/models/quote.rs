use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single best-effort market quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    /// Daily change in percent, if the source reported one
    pub change_percent: Option<f64>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            price,
            change_percent: None,
        }
    }

    pub fn with_change(mut self, change_percent: f64) -> Self {
        self.change_percent = Some(change_percent);
        self
    }
}

/// Parse a percent string as quote sources report it (e.g., "+1.23%", "-0.5%").
pub fn parse_change_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    let value: f64 = trimmed.strip_prefix('+').unwrap_or(trimmed).parse().ok()?;
    value.is_finite().then_some(value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedQuote {
    pub quote: Quote,
    pub fetched_at: DateTime<Utc>,
}

/// Last successful quote per symbol.
///
/// A quote younger than the TTL is served as-is so the upstream source
/// is not hit more than once per TTL window for the same symbol.
/// Failures are never stored here.
#[derive(Debug, Clone, Default)]
pub struct QuoteCache {
    entries: HashMap<String, CachedQuote>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached quote for `symbol` if it was fetched less than `ttl` before `now`.
    pub fn get_fresh(&self, symbol: &str, now: DateTime<Utc>, ttl: Duration) -> Option<&Quote> {
        let entry = self.entries.get(&symbol.to_uppercase())?;
        (now - entry.fetched_at < ttl).then_some(&entry.quote)
    }

    /// Store `quote` under the symbol it was requested for, which may differ
    /// from the symbol the source reported.
    pub fn insert(&mut self, symbol: &str, quote: Quote, fetched_at: DateTime<Utc>) {
        self.entries
            .insert(symbol.trim().to_uppercase(), CachedQuote { quote, fetched_at });
    }

    pub fn get(&self, symbol: &str) -> Option<&CachedQuote> {
        self.entries.get(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
