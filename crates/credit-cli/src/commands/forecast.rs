//! Forecast command implementation

use anyhow::{Context, Result};
use credit_core::{ForecastSource, ForecastView, PointKind, ViewScope};

use super::{fetch_in_view, print_json, signed, App};

pub async fn cmd_forecast(app: &App, base_score: Option<i32>, json: bool) -> Result<()> {
    let session = app.require_session()?;

    let scope = ViewScope::new();
    let fetch = app.dashboard.forecast(&session, base_score);
    let Some(result) = fetch_in_view(&scope, "forecast", fetch).await else {
        return Ok(());
    };
    let view = result.context("Failed to load forecast")?;

    if json {
        return print_json(&view);
    }

    println!();
    println!("📈 Credit Score Forecast for {}", session.username);
    println!("   ─────────────────────────────────────────────────────────────");
    print_forecast(&view);
    println!();
    Ok(())
}

/// Render the forecast table and summary
pub fn print_forecast(view: &ForecastView) {
    if let ForecastSource::Fallback { reason } = &view.source {
        println!("   ⚠️  {}", reason);
        println!("      Showing sample data instead.");
        println!();
    }

    println!("   {:<8} {:>6}  {:<12} {}", "Month", "Score", "Range", "");
    for point in &view.points {
        let range = match (point.confidence_lower, point.confidence_upper) {
            (Some(lower), Some(upper)) => format!("{}-{}", lower, upper),
            _ => String::new(),
        };
        let marker = match point.kind {
            PointKind::Historical => "●",
            PointKind::Predicted => "◌ predicted",
        };
        println!(
            "   {:<8} {:>6}  {:<12} {}",
            point.month, point.score, range, marker
        );
    }

    let summary = &view.summary;
    println!();
    println!(
        "   Historical trend: {} over {} months",
        signed(summary.historical_trend),
        summary.historical_months
    );
    if let Some(final_score) = summary.final_prediction {
        println!(
            "   Predicted:        {} ({} in {} months)",
            final_score,
            signed(summary.predicted_change),
            summary.predicted_months
        );
    }
}
