//! Credit Lens CLI - Credit profile client
//!
//! Usage:
//!   credit login alice -p ...   Log in and save the session
//!   credit forecast             Credit score forecast
//!   credit expenses             Expense breakdown
//!   credit dashboard            Everything at once

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let app = commands::open_app(
        cli.config.as_deref(),
        cli.api_url.as_deref(),
        cli.session_dir.as_deref(),
    )?;
    let json = cli.json;

    match cli.command {
        Commands::Login { username, password } => {
            commands::cmd_login(&app, &username, password.as_deref(), json).await
        }
        Commands::Logout => commands::cmd_logout(&app, json),
        Commands::Status => commands::cmd_status(&app, json),
        Commands::Forecast { base_score } => commands::cmd_forecast(&app, base_score, json).await,
        Commands::Expenses => commands::cmd_expenses(&app, json).await,
        Commands::Health => commands::cmd_health(&app, json),
        Commands::Dashboard { base_score } => commands::cmd_dashboard(&app, base_score, json).await,
    }
}
