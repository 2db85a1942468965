use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::QuoteError;
use crate::models::quote::{parse_change_percent, Quote};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage GLOBAL_QUOTE provider for stock prices.
///
/// - **Free tier**: heavily rate limited; limit hits come back as HTTP 200
///   with a `Note` or `Information` field instead of a quote.
/// - **Requires**: API key (settings key "alphavantage"). Without one every
///   lookup fails with `QuoteError::Misconfigured` and no request is sent.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (e.g., a local stub server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Map a GLOBAL_QUOTE response body to a quote or a typed failure.
    pub fn parse_quote_response(symbol: &str, body: &str) -> Result<Quote, QuoteError> {
        let resp: GlobalQuoteResponse =
            serde_json::from_str(body).map_err(|e| QuoteError::Unavailable {
                symbol: symbol.to_string(),
                message: format!("unexpected response body: {e}"),
            })?;
        resp.into_quote(symbol)
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

impl GlobalQuoteResponse {
    fn into_quote(self, symbol: &str) -> Result<Quote, QuoteError> {
        let has_quote_block = self.global_quote.is_some();

        if let Some(quote) = self.global_quote {
            if let Some(raw_price) = quote.price {
                let price: f64 = raw_price.trim().parse().map_err(|_| QuoteError::Unavailable {
                    symbol: symbol.to_string(),
                    message: format!("invalid price format '{raw_price}'"),
                })?;
                if !price.is_finite() || price <= 0.0 {
                    return Err(QuoteError::Unavailable {
                        symbol: symbol.to_string(),
                        message: format!("invalid price {price} (must be finite and positive)"),
                    });
                }
                let reported = quote
                    .symbol
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| symbol.to_string());
                return Ok(Quote {
                    symbol: reported.trim().to_uppercase(),
                    price,
                    change_percent: quote.change_percent.as_deref().and_then(parse_change_percent),
                });
            }
        }

        if self.note.is_some() || self.information.is_some() {
            return Err(QuoteError::RateLimited {
                symbol: symbol.to_string(),
            });
        }
        if let Some(message) = self.error_message {
            return Err(QuoteError::InvalidSymbol {
                symbol: symbol.to_string(),
                message,
            });
        }
        if has_quote_block {
            // Unknown tickers come back as an empty "Global Quote" object.
            return Err(QuoteError::InvalidSymbol {
                symbol: symbol.to_string(),
                message: "no quote data returned".into(),
            });
        }
        Err(QuoteError::Unavailable {
            symbol: symbol.to_string(),
            message: "response contained no quote".into(),
        })
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            QuoteError::Misconfigured("API key for stock data is not configured".into())
        })?;

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| QuoteError::from_transport(symbol, &e))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::RateLimited {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(QuoteError::Unavailable {
                symbol: symbol.to_string(),
                message: format!("API request failed ({status})"),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| QuoteError::from_transport(symbol, &e))?;
        Self::parse_quote_response(symbol, &body)
    }
}
