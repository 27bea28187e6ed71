//! Expenses command implementation

use anyhow::{Context, Result};
use credit_core::{ExpenseBreakdown, Trend, ViewScope};

use super::{fetch_in_view, print_json, trend_arrow, App};

/// Width of a 100% bar
const BAR_WIDTH: f64 = 30.0;

pub async fn cmd_expenses(app: &App, json: bool) -> Result<()> {
    let session = app.require_session()?;

    let scope = ViewScope::new();
    let fetch = app.dashboard.expenses(session.identity());
    let Some(result) = fetch_in_view(&scope, "expenses", fetch).await else {
        return Ok(());
    };
    let breakdown = result.context("Failed to load expenses")?;

    if json {
        return print_json(&breakdown);
    }

    println!();
    println!("💸 Expenses for {}", session.username);
    println!("   ─────────────────────────────────────────────────────────────");
    print_expenses(&breakdown);
    println!();
    Ok(())
}

/// Render the category table and monthly totals
pub fn print_expenses(breakdown: &ExpenseBreakdown) {
    if breakdown.categories.is_empty() {
        println!("   No expenses recorded.");
        return;
    }

    for category in &breakdown.categories {
        let bar = "█".repeat((category.percentage / 100.0 * BAR_WIDTH).round() as usize);
        let trend = match category.trend {
            Trend::Stable => String::new(),
            trend => format!("{} {}%", trend_arrow(trend), category.trend_value),
        };
        println!(
            "   {:<14} ${:>10.2} {:>5.1}%  {:<30} {}",
            category.name, category.amount, category.percentage, bar, trend
        );
    }
    println!("   {:<14} ${:>10.2}", "Total", breakdown.total_expenses);

    if !breakdown.monthly.is_empty() {
        println!();
        println!("   Monthly:");
        for point in &breakdown.monthly {
            println!("     {:<8} ${:.2}", point.month, point.amount);
        }
    }
}
