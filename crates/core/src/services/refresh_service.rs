use chrono::Utc;
use futures::future::join_all;
use std::sync::RwLock;
use uuid::Uuid;

use super::position_service::PositionService;
use super::quote_service::QuoteService;
use super::{read_store, write_store};
use crate::errors::{CoreError, QuoteError};
use crate::models::position::PositionStore;
use crate::models::quote::Quote;

/// What happened to one position's refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The quote was written to the position's `last_price`
    Updated { id: Uuid, symbol: String, quote: Quote },
    /// The lookup failed; the last known price stays in place
    Failed {
        id: Uuid,
        symbol: String,
        error: QuoteError,
    },
    /// The position was removed while the lookup was in flight; the quote was dropped
    Discarded { id: Uuid, symbol: String },
}

impl RefreshOutcome {
    pub fn id(&self) -> Uuid {
        match self {
            RefreshOutcome::Updated { id, .. }
            | RefreshOutcome::Failed { id, .. }
            | RefreshOutcome::Discarded { id, .. } => *id,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            RefreshOutcome::Updated { symbol, .. }
            | RefreshOutcome::Failed { symbol, .. }
            | RefreshOutcome::Discarded { symbol, .. } => symbol,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated { .. })
    }

    /// Non-blocking warning to show next to the position, if any.
    pub fn warning(&self) -> Option<String> {
        match self {
            RefreshOutcome::Failed { error, .. } => {
                Some(format!("Update failed: {error}. Using last known price."))
            }
            _ => None,
        }
    }
}

/// Keeps position prices current by pulling quotes and writing them back.
///
/// Each refresh reads the symbol under a short read lock, fetches without
/// holding any lock, then replaces `last_price` under a short write lock.
/// Buy/sell may run in between; they own `shares`/`avg_cost`, the refresh
/// owns the price fields, so the last write per field wins.
pub struct RefreshService {
    quotes: QuoteService,
    positions: PositionService,
}

impl RefreshService {
    pub fn new(quotes: QuoteService) -> Self {
        Self {
            quotes,
            positions: PositionService::new(),
        }
    }

    pub fn quotes(&self) -> &QuoteService {
        &self.quotes
    }

    /// Refresh a single position on demand.
    pub async fn refresh_position(
        &self,
        store: &RwLock<PositionStore>,
        id: Uuid,
    ) -> Result<RefreshOutcome, CoreError> {
        let symbol = read_store(store)
            .get(id)
            .map(|p| p.symbol.clone())
            .ok_or_else(|| CoreError::PositionNotFound(id.to_string()))?;

        let quote = match self.quotes.fetch_price(&symbol).await {
            Ok(quote) => quote,
            Err(error) => {
                tracing::warn!(%id, %symbol, kind = error.kind(), %error, "quote refresh failed, keeping last price");
                return Ok(RefreshOutcome::Failed { id, symbol, error });
            }
        };

        let applied = {
            let mut guard = write_store(store);
            self.positions.apply_quote(&mut guard, id, &quote, Utc::now())
        };

        match applied {
            Ok(()) => {
                tracing::info!(%id, %symbol, price = quote.price, "price refreshed");
                Ok(RefreshOutcome::Updated { id, symbol, quote })
            }
            Err(_) => {
                tracing::info!(%id, %symbol, "position removed during refresh, quote discarded");
                Ok(RefreshOutcome::Discarded { id, symbol })
            }
        }
    }

    /// Refresh every position concurrently. One slow or failing lookup
    /// never holds back or alters the others.
    pub async fn refresh_all(&self, store: &RwLock<PositionStore>) -> Vec<RefreshOutcome> {
        let ids = read_store(store).ids();

        join_all(ids.into_iter().map(|id| self.refresh_position(store, id)))
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    // Removed before its lookup started; nothing to report.
                    tracing::debug!(error = %e, "skipped refresh");
                    None
                }
            })
            .collect()
    }
}
