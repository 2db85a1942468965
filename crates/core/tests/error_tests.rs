// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError / QuoteError variants, Display, From impls
// ═══════════════════════════════════════════════════════════════════

use finance_dashboard_core::errors::{redact_query, CoreError, QuoteError};

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn duplicate_symbol() {
        let err = CoreError::DuplicateSymbol("AAPL".into());
        assert_eq!(err.to_string(), "An investment with the symbol AAPL already exists");
    }

    #[test]
    fn position_not_found() {
        let err = CoreError::PositionNotFound("abc".into());
        assert_eq!(err.to_string(), "Position not found: abc");
    }

    #[test]
    fn insufficient_shares() {
        let err = CoreError::InsufficientShares {
            symbol: "TSLA".into(),
            requested: 9.0,
            held: 8.0,
        };
        assert_eq!(err.to_string(), "Cannot sell 9 shares of TSLA — only 8 held");
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("Shares must be positive".into());
        assert_eq!(err.to_string(), "Validation failed: Shares must be positive");
    }

    #[test]
    fn no_provider() {
        let err = CoreError::NoProvider("generative insights".into());
        assert_eq!(err.to_string(), "No provider configured for generative insights");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "OpenAI".into(),
            message: "request failed (500)".into(),
        };
        assert_eq!(err.to_string(), "API error (OpenAI): request failed (500)");
    }

    #[test]
    fn rate_limited() {
        let err = QuoteError::RateLimited {
            symbol: "MSFT".into(),
        };
        assert_eq!(err.to_string(), "API limit likely hit for MSFT");
    }

    #[test]
    fn invalid_symbol() {
        let err = QuoteError::InvalidSymbol {
            symbol: "XXXX".into(),
            message: "no quote data returned".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid symbol or API error for XXXX: no quote data returned"
        );
    }

    #[test]
    fn quote_error_is_transparent_inside_core_error() {
        let quote_err = QuoteError::Misconfigured("API key missing".into());
        let err: CoreError = quote_err.clone().into();
        assert_eq!(err.to_string(), quote_err.to_string());
        assert!(matches!(err, CoreError::Quote(QuoteError::Misconfigured(_))));
    }
}

// ── Quote error kinds ───────────────────────────────────────────────

#[test]
fn quote_error_kinds_are_distinct() {
    let kinds = [
        QuoteError::RateLimited { symbol: "A".into() }.kind(),
        QuoteError::InvalidSymbol {
            symbol: "A".into(),
            message: String::new(),
        }
        .kind(),
        QuoteError::Unavailable {
            symbol: "A".into(),
            message: String::new(),
        }
        .kind(),
        QuoteError::Misconfigured(String::new()).kind(),
    ];
    assert_eq!(kinds, ["rate_limited", "invalid_symbol", "unavailable", "misconfigured"]);
}

// ── Redaction ───────────────────────────────────────────────────────

#[test]
fn redact_query_strips_api_key() {
    let msg = "error sending request for url (https://www.alphavantage.co/query?function=GLOBAL_QUOTE&apikey=SECRET)";
    let redacted = redact_query(msg);
    assert!(!redacted.contains("SECRET"));
    assert!(redacted.ends_with("?<query redacted>"));
}

#[test]
fn redact_query_leaves_plain_messages() {
    assert_eq!(redact_query("connection refused"), "connection refused");
}

// ── From impls ──────────────────────────────────────────────────────

#[test]
fn from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: CoreError = json_err.into();
    assert!(matches!(err, CoreError::Deserialization(_)));
}

// ── Trait bounds ────────────────────────────────────────────────────

#[test]
fn errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
    assert_send_sync::<CoreError>();
    assert_send_sync::<QuoteError>();
}
