use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A held quantity of one stock symbol with its cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier, assigned at creation and never changed
    pub id: Uuid,

    /// Ticker symbol, uppercased (e.g., "AAPL")
    pub symbol: String,

    /// Display label (e.g., "Apple Inc.")
    pub name: String,

    /// Number of shares held (always > 0 while the position exists)
    pub shares: f64,

    /// Weighted average purchase price per share
    pub avg_cost: f64,

    /// Most recently known market price per share
    pub last_price: f64,

    /// Daily change reported by the last successful quote, in percent
    #[serde(default)]
    pub day_change_pct: Option<f64>,

    /// When `last_price` was last replaced by a quote (None = still the seed price)
    #[serde(default)]
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl Position {
    /// Total market value at the last known price.
    pub fn market_value(&self) -> f64 {
        self.shares * self.last_price
    }

    /// Total amount paid for the shares currently held.
    pub fn cost_basis(&self) -> f64 {
        self.shares * self.avg_cost
    }
}

/// Candidate for the "add position" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPosition {
    pub symbol: String,
    pub name: String,
    pub shares: f64,
    pub avg_cost: f64,
}

impl NewPosition {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        shares: f64,
        avg_cost: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            shares,
            avg_cost,
        }
    }

    /// Symbol as it will be stored: trimmed and uppercased.
    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }
}

/// Derived value/cost figures for one position. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Price per share the valuation was computed with
    pub price_used: f64,
    pub total_value: f64,
    pub total_cost: f64,
    /// total_value - total_cost
    pub gain_loss_abs: f64,
    /// gain_loss_abs / total_cost * 100, or 0 when there is no cost
    pub gain_loss_pct: f64,
}

impl Valuation {
    pub fn compute(shares: f64, avg_cost: f64, price: f64) -> Self {
        let total_value = shares * price;
        let total_cost = shares * avg_cost;
        let gain_loss_abs = total_value - total_cost;
        let gain_loss_pct = if total_cost > 0.0 {
            gain_loss_abs / total_cost * 100.0
        } else {
            0.0
        };
        Self {
            price_used: price,
            total_value,
            total_cost,
            gain_loss_abs,
            gain_loss_pct,
        }
    }
}

/// The authoritative, insertion-ordered set of positions.
///
/// Only `PositionService` mutates it; everything else reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionStore {
    pub(crate) positions: Vec<Position>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    /// Look up a position by symbol (case-insensitive).
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&Position> {
        let upper = symbol.trim().to_uppercase();
        self.positions.iter().find(|p| p.symbol == upper)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.positions.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub(crate) fn get_mut(&mut self, id: Uuid) -> Option<&mut Position> {
        self.positions.iter_mut().find(|p| p.id == id)
    }
}

/// Result of a successful sell.
#[derive(Debug, Clone, PartialEq)]
pub enum SellOutcome {
    /// Shares remain; the updated position is returned
    Reduced(Position),
    /// All shares were sold and the position left the store
    Closed { id: Uuid, symbol: String },
}
