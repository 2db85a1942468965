use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of all positions at their last known prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Number of positions held
    pub position_count: usize,

    /// Sum of shares × last_price
    pub total_value: f64,

    /// Sum of shares × avg_cost
    pub total_cost: f64,

    /// total_value - total_cost
    pub total_gain_loss: f64,

    /// total_gain_loss / total_cost × 100 (0 when nothing is invested)
    pub total_return_pct: f64,

    /// Per-position breakdown, in store order
    pub holdings: Vec<HoldingSummary>,
}

/// Summary of a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingSummary {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub shares: f64,
    pub avg_cost: f64,
    pub last_price: f64,
    pub day_change_pct: Option<f64>,
    pub current_value: f64,
    pub total_cost: f64,
    pub gain_loss: f64,
    pub return_pct: f64,

    /// This position's value / total portfolio value × 100
    pub allocation_pct: f64,
}
