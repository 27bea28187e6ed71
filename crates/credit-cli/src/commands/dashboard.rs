//! Dashboard command implementation

use anyhow::Result;
use credit_core::ViewScope;
use serde_json::{json, Value};

use super::{fetch_in_view, print_expenses, print_forecast, print_health, print_json, App};

fn result_json<T: serde::Serialize>(result: &credit_core::Result<T>) -> Value {
    match result {
        Ok(value) => json!(value),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

pub async fn cmd_dashboard(app: &App, base_score: Option<i32>, json: bool) -> Result<()> {
    let session = app.require_session()?;

    let scope = ViewScope::new();
    let fetch = app.dashboard.load(&session, base_score);
    let Some(data) = fetch_in_view(&scope, "dashboard", fetch).await else {
        return Ok(());
    };

    if json {
        return print_json(&json!({
            "session": data.session,
            "health": data.health,
            "forecast": result_json(&data.forecast),
            "expenses": result_json(&data.expenses),
        }));
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         💳 Credit Lens Dashboard        │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Welcome back, {}", session.name);
    println!();
    println!("  Credit Score:     {}", session.credit_score);
    println!("  Monthly Income:   ${:.2}", session.monthly_income);
    println!("  Total Debt:       ${:.2}", session.total_debt);
    if let Some(years) = session.credit_age {
        println!("  Credit Age:       {:.1} years", years);
    }

    println!();
    println!("  🩺 Financial Health");
    print_health(&data.health);

    println!();
    println!("  📈 Score Forecast");
    match &data.forecast {
        Ok(view) => print_forecast(view),
        Err(e) => println!("   ❌ {}", e),
    }

    println!();
    println!("  💸 Expenses");
    match &data.expenses {
        Ok(breakdown) => print_expenses(breakdown),
        Err(e) => println!("   ❌ Failed to load expenses: {}", e),
    }
    println!();

    Ok(())
}
