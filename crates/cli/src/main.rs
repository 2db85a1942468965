mod logging;
mod opt;

use anyhow::Context;
use clap::Parser;
use finance_dashboard_core::models::position::{NewPosition, Position, SellOutcome};
use finance_dashboard_core::models::settings::Settings;
use finance_dashboard_core::services::refresh_service::RefreshOutcome;
use finance_dashboard_core::FinanceDashboard;

use opt::{Command, DashboardCli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging()?;

    let cli = DashboardCli::parse();
    let settings = Settings::from_env();
    let dashboard = FinanceDashboard::with_seed_data(settings).context("failed to load demo data")?;
    tracing::debug!(?dashboard, "dashboard ready");

    let command = cli.command.unwrap_or(Command::Portfolio);
    // A single-symbol refresh fetches only that symbol.
    if !cli.offline && !matches!(command, Command::Refresh { .. }) {
        let outcomes = dashboard.refresh_all().await;
        print_refresh_warnings(&outcomes);
    }

    match command {
        Command::Portfolio => print_portfolio(&dashboard),
        Command::Add {
            symbol,
            name,
            shares,
            price,
        } => {
            let id = dashboard.add_position(NewPosition::new(symbol, name, shares, price))?;
            if let Some(position) = dashboard.position(id) {
                println!("Added {} ({})", position.name, position.symbol);
            }
            print_portfolio(&dashboard);
        }
        Command::Buy {
            symbol,
            shares,
            price,
        } => {
            let id = lookup(&dashboard, &symbol)?.id;
            let position = dashboard.buy(id, shares, price)?;
            println!(
                "Bought {shares} {} @ ${price:.2}; now {} shares, avg cost ${:.2}",
                position.symbol, position.shares, position.avg_cost
            );
            print_portfolio(&dashboard);
        }
        Command::Sell { symbol, shares } => {
            let id = lookup(&dashboard, &symbol)?.id;
            match dashboard.sell(id, shares)? {
                SellOutcome::Reduced(position) => println!(
                    "Sold {shares} {}; {} shares remaining",
                    position.symbol, position.shares
                ),
                SellOutcome::Closed { symbol, .. } => {
                    println!("Sold all shares of {symbol}; position closed")
                }
            }
            print_portfolio(&dashboard);
        }
        Command::Refresh { symbol } => {
            let id = lookup(&dashboard, &symbol)?.id;
            match dashboard.refresh_position(id).await? {
                RefreshOutcome::Updated { symbol, quote, .. } => {
                    println!("{symbol}: ${:.2}", quote.price)
                }
                outcome @ RefreshOutcome::Failed { .. } => print_refresh_warnings(&[outcome]),
                RefreshOutcome::Discarded { symbol, .. } => {
                    println!("{symbol} was removed before its quote arrived")
                }
            }
            print_portfolio(&dashboard);
        }
        Command::Budgets => print_budgets(&dashboard),
        Command::Insights => print_insights(&dashboard).await,
    }

    Ok(())
}

fn lookup(dashboard: &FinanceDashboard, symbol: &str) -> anyhow::Result<Position> {
    dashboard
        .find_by_symbol(symbol)
        .with_context(|| format!("no position with symbol {}", symbol.to_uppercase()))
}

fn print_refresh_warnings(outcomes: &[RefreshOutcome]) {
    for outcome in outcomes {
        if let Some(warning) = outcome.warning() {
            eprintln!("{}: {warning}", outcome.symbol());
        }
    }
}

fn print_portfolio(dashboard: &FinanceDashboard) {
    let summary = dashboard.portfolio_summary();
    if summary.holdings.is_empty() {
        println!("No investments added yet.");
        return;
    }

    println!(
        "{:<8} {:<20} {:>10} {:>12} {:>14} {:>10} {:>8}",
        "Symbol", "Name", "Shares", "Price", "Value", "Gain %", "Alloc %"
    );
    for h in &summary.holdings {
        let day = h
            .day_change_pct
            .map(|pct| format!(" ({pct:+.2}% daily)"))
            .unwrap_or_default();
        println!(
            "{:<8} {:<20} {:>10.2} {:>12.2} {:>14.2} {:>10.2} {:>8.1}{day}",
            h.symbol, h.name, h.shares, h.last_price, h.current_value, h.return_pct, h.allocation_pct
        );
    }
    println!(
        "\nTotal value ${:.2} | cost ${:.2} | gain/loss ${:.2} ({:+.2}%)",
        summary.total_value, summary.total_cost, summary.total_gain_loss, summary.total_return_pct
    );
}

fn print_budgets(dashboard: &FinanceDashboard) {
    println!("{:<16} {:>10} {:>10} {:>10} {:>8}", "Category", "Limit", "Spent", "Left", "Used %");
    for status in dashboard.budget_statuses() {
        let flag = if status.exceeded { "  over budget" } else { "" };
        println!(
            "{:<16} {:>10.2} {:>10.2} {:>10.2} {:>8.1}{flag}",
            status.category, status.limit, status.spent, status.remaining, status.percent_used
        );
    }

    let flow = dashboard.cash_flow();
    println!(
        "\nIncome ${:.2} | expenses ${:.2} | net ${:.2}",
        flow.income, flow.expenses, flow.net
    );

    println!("\nSpending trend:");
    for month in dashboard.monthly_expenses() {
        println!("  {:<16} {:>10.2}", month.label(), month.amount);
    }

    println!("\nExpenses by category:");
    for expense in dashboard.expenses_by_category() {
        println!("  {:<16} {:>10.2}", expense.category, expense.amount);
    }
}

async fn print_insights(dashboard: &FinanceDashboard) {
    if !dashboard.insights_available() {
        println!("Generated insights are unavailable: set OPENAI_API_KEY to enable them.");
        return;
    }

    let today = chrono::Local::now().date_naive();
    match dashboard.spending_summary(today).await {
        Ok(summary) => println!("Spending summary:\n{}\n", summary.summary),
        Err(e) => eprintln!("Could not generate spending summary: {e}"),
    }
    match dashboard.investment_tips().await {
        Ok(tips) => {
            println!("Investment tips:\n{}\n", tips.investment_tips);
            println!("Risk assessment:\n{}\n", tips.risk_assessment);
            println!("{}", tips.recommendations_disclaimer);
        }
        Err(e) => eprintln!("Could not generate investment tips: {e}"),
    }
}
