use thiserror::Error;

/// Unified error type for the finance-dashboard-core library.
/// Every public function outside the quote boundary returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Position Store ──────────────────────────────────────────────
    #[error("An investment with the symbol {0} already exists")]
    DuplicateSymbol(String),

    #[error("Position not found: {0}")]
    PositionNotFound(String),

    #[error("Cannot sell {requested} shares of {symbol} — only {held} held")]
    InsufficientShares {
        symbol: String,
        requested: f64,
        held: f64,
    },

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Quotes ──────────────────────────────────────────────────────
    #[error(transparent)]
    Quote(#[from] QuoteError),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No provider configured for {0}")]
    NoProvider(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Failure kinds of a single quote lookup.
///
/// None of these are fatal: the caller keeps the last known price and
/// surfaces the message as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("API limit likely hit for {symbol}")]
    RateLimited { symbol: String },

    #[error("Invalid symbol or API error for {symbol}: {message}")]
    InvalidSymbol { symbol: String, message: String },

    #[error("Quote source unavailable for {symbol}: {message}")]
    Unavailable { symbol: String, message: String },

    #[error("Quote source is not configured: {0}")]
    Misconfigured(String),
}

impl QuoteError {
    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteError::RateLimited { .. } => "rate_limited",
            QuoteError::InvalidSymbol { .. } => "invalid_symbol",
            QuoteError::Unavailable { .. } => "unavailable",
            QuoteError::Misconfigured(_) => "misconfigured",
        }
    }

    /// Build an `Unavailable` error from a transport failure, with the URL query redacted.
    pub fn from_transport(symbol: &str, e: &reqwest::Error) -> Self {
        QuoteError::Unavailable {
            symbol: symbol.to_string(),
            message: redact_query(&e.to_string()),
        }
    }
}

/// Strip query parameters from a message that may contain a full URL.
/// reqwest errors embed the request URL, and our URLs carry API keys.
pub fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        CoreError::Network(redact_query(&e.to_string()))
    }
}
