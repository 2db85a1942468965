use clap::{Parser, Subcommand};

/// Personal finance dashboard: portfolio, budgets and generated insights.
///
/// Every run starts from the demo data; changes are not persisted.
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct DashboardCli {
    /// Skip the live quote refresh and show seed prices.
    #[arg(long, global = true)]
    pub offline: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the investment portfolio (default).
    Portfolio,
    /// Add a new position.
    Add {
        symbol: String,
        name: String,
        shares: f64,
        /// Purchase price per share.
        price: f64,
    },
    /// Buy more shares of a held symbol.
    Buy {
        symbol: String,
        shares: f64,
        /// Price paid per share.
        price: f64,
    },
    /// Sell shares of a held symbol.
    Sell { symbol: String, shares: f64 },
    /// Fetch a fresh quote for one held symbol.
    Refresh { symbol: String },
    /// Show budgets, cash flow and expenses by category.
    Budgets,
    /// Request generated spending summary and investment tips.
    Insights,
}
