use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::analytics::{HoldingSummary, PortfolioSummary};
use crate::models::position::{NewPosition, Position, PositionStore, SellOutcome, Valuation};
use crate::models::quote::Quote;

/// Share quantities closer than this are considered equal.
pub const SHARE_EPSILON: f64 = 1e-9;

const MAX_SYMBOL_LEN: usize = 10;
const MAX_NAME_LEN: usize = 50;

/// Applies ownership-changing operations to a `PositionStore`.
///
/// Synchronous and I/O-free. Every operation either
/// succeeds completely or returns an error with the store untouched.
pub struct PositionService;

impl PositionService {
    pub fn new() -> Self {
        Self
    }

    /// Insert a new position. Its `last_price` starts at `avg_cost`.
    /// Fails with `DuplicateSymbol` if the symbol is already held (case-insensitive).
    pub fn add_position(
        &self,
        store: &mut PositionStore,
        candidate: NewPosition,
    ) -> Result<Uuid, CoreError> {
        let symbol = candidate.normalized_symbol();
        let name = candidate.name.trim().to_string();

        if symbol.is_empty() || symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(CoreError::ValidationError(format!(
                "Symbol must be 1 to {MAX_SYMBOL_LEN} characters, got '{}'",
                candidate.symbol
            )));
        }
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(CoreError::ValidationError(format!(
                "Name must be 1 to {MAX_NAME_LEN} characters"
            )));
        }
        Self::validate_shares(candidate.shares)?;
        Self::validate_positive("Purchase price", candidate.avg_cost)?;

        if store.find_by_symbol(&symbol).is_some() {
            return Err(CoreError::DuplicateSymbol(symbol));
        }

        let position = Position {
            id: Uuid::new_v4(),
            symbol,
            name,
            shares: candidate.shares,
            avg_cost: candidate.avg_cost,
            last_price: candidate.avg_cost,
            day_change_pct: None,
            last_refreshed: None,
        };
        let id = position.id;
        tracing::info!(%id, symbol = %position.symbol, shares = position.shares, "position added");
        store.positions.push(position);
        Ok(id)
    }

    /// Buy more shares, recomputing the weighted average cost.
    ///
    /// `new_avg = (shares × avg_cost + bought × price) / (shares + bought)`
    pub fn buy(
        &self,
        store: &mut PositionStore,
        id: Uuid,
        shares_bought: f64,
        price_per_share: f64,
    ) -> Result<Position, CoreError> {
        Self::validate_shares(shares_bought)?;
        Self::validate_positive("Price", price_per_share)?;

        let position = store
            .get_mut(id)
            .ok_or_else(|| CoreError::PositionNotFound(id.to_string()))?;

        let new_shares = position.shares + shares_bought;
        let new_avg_cost =
            (position.shares * position.avg_cost + shares_bought * price_per_share) / new_shares;
        if !new_shares.is_finite() || !new_avg_cost.is_finite() || new_avg_cost <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Buying {shares_bought} shares at {price_per_share} overflows the position"
            )));
        }

        // Both fields are computed before either is written.
        position.shares = new_shares;
        position.avg_cost = new_avg_cost;

        tracing::info!(
            %id,
            symbol = %position.symbol,
            shares_bought,
            price_per_share,
            avg_cost = new_avg_cost,
            "shares bought"
        );
        Ok(position.clone())
    }

    /// Sell shares. The average cost is unchanged; the position is removed
    /// when no shares remain.
    pub fn sell(
        &self,
        store: &mut PositionStore,
        id: Uuid,
        shares_sold: f64,
    ) -> Result<SellOutcome, CoreError> {
        Self::validate_positive("Shares", shares_sold)?;

        let idx = store
            .positions
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::PositionNotFound(id.to_string()))?;

        let held = store.positions[idx].shares;
        if shares_sold - held > SHARE_EPSILON {
            return Err(CoreError::InsufficientShares {
                symbol: store.positions[idx].symbol.clone(),
                requested: shares_sold,
                held,
            });
        }

        let remaining = held - shares_sold;
        if remaining <= SHARE_EPSILON {
            let removed = store.positions.remove(idx);
            tracing::info!(%id, symbol = %removed.symbol, "position closed");
            return Ok(SellOutcome::Closed {
                id,
                symbol: removed.symbol,
            });
        }

        let position = &mut store.positions[idx];
        position.shares = remaining;
        tracing::info!(%id, symbol = %position.symbol, shares_sold, remaining, "shares sold");
        Ok(SellOutcome::Reduced(position.clone()))
    }

    /// Value/cost/gain figures for one position, at `price_override` if given,
    /// otherwise at its last known price.
    pub fn valuation(
        &self,
        store: &PositionStore,
        id: Uuid,
        price_override: Option<f64>,
    ) -> Result<Valuation, CoreError> {
        let position = store
            .get(id)
            .ok_or_else(|| CoreError::PositionNotFound(id.to_string()))?;

        let price = match price_override {
            Some(p) => {
                Self::validate_positive("Price override", p)?;
                p
            }
            None => position.last_price,
        };
        Ok(Valuation::compute(position.shares, position.avg_cost, price))
    }

    /// Replace a position's last known price with a fresh quote.
    ///
    /// Touches only the price fields; `shares` and `avg_cost` belong to buy/sell.
    /// Returns `PositionNotFound` if the position was removed in the meantime.
    pub fn apply_quote(
        &self,
        store: &mut PositionStore,
        id: Uuid,
        quote: &Quote,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let position = store
            .get_mut(id)
            .ok_or_else(|| CoreError::PositionNotFound(id.to_string()))?;
        position.last_price = quote.price;
        position.day_change_pct = quote.change_percent;
        position.last_refreshed = Some(at);
        Ok(())
    }

    /// Totals across all positions with per-position allocation.
    pub fn portfolio_summary(&self, store: &PositionStore) -> PortfolioSummary {
        let total_value: f64 = store.iter().map(Position::market_value).sum();
        let total_cost: f64 = store.iter().map(Position::cost_basis).sum();
        let total_gain_loss = total_value - total_cost;
        let total_return_pct = if total_cost > 0.0 {
            total_gain_loss / total_cost * 100.0
        } else {
            0.0
        };

        let holdings = store
            .iter()
            .map(|p| {
                let v = Valuation::compute(p.shares, p.avg_cost, p.last_price);
                HoldingSummary {
                    id: p.id,
                    symbol: p.symbol.clone(),
                    name: p.name.clone(),
                    shares: p.shares,
                    avg_cost: p.avg_cost,
                    last_price: p.last_price,
                    day_change_pct: p.day_change_pct,
                    current_value: v.total_value,
                    total_cost: v.total_cost,
                    gain_loss: v.gain_loss_abs,
                    return_pct: v.gain_loss_pct,
                    allocation_pct: if total_value > 0.0 {
                        v.total_value / total_value * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        PortfolioSummary {
            position_count: store.len(),
            total_value,
            total_cost,
            total_gain_loss,
            total_return_pct,
            holdings,
        }
    }

    /// Quantities at or below `SHARE_EPSILON` would count as an empty position.
    fn validate_shares(shares: f64) -> Result<(), CoreError> {
        Self::validate_positive("Shares", shares)?;
        if shares <= SHARE_EPSILON {
            return Err(CoreError::ValidationError(format!(
                "Shares must be greater than {SHARE_EPSILON}, got {shares}"
            )));
        }
        Ok(())
    }

    fn validate_positive(label: &str, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "{label} must be a positive number, got {value}"
            )));
        }
        Ok(())
    }
}

impl Default for PositionService {
    fn default() -> Self {
        Self::new()
    }
}
