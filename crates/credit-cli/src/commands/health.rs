//! Financial health command implementation

use anyhow::Result;
use credit_core::{assess, HealthMetric, HealthTier};

use super::{print_json, trend_arrow, App};

pub fn cmd_health(app: &App, json: bool) -> Result<()> {
    let session = app.require_session()?;
    let metrics = assess(&session);

    if json {
        return print_json(&metrics);
    }

    println!();
    println!("🩺 Financial Health for {}", session.username);
    println!("   ─────────────────────────────────────────────────────────────");
    print_health(&metrics);
    println!();
    Ok(())
}

fn tier_icon(tier: HealthTier) -> &'static str {
    match tier {
        HealthTier::Good => "🟢",
        HealthTier::Warning => "🟡",
        HealthTier::Danger => "🔴",
    }
}

/// Render one line per metric
pub fn print_health(metrics: &[HealthMetric]) {
    for metric in metrics {
        println!(
            "   {} {:<22} {:>5.1}%  {:<10} {}",
            tier_icon(metric.tier),
            metric.kind.title(),
            metric.value,
            metric.status,
            trend_arrow(metric.trend)
        );
        println!("      {}", metric.kind.description());
    }
}
