//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Environment variable holding the login password
pub const PASSWORD_ENV: &str = "CREDIT_PASSWORD";

/// Credit Lens - Your credit profile at a glance
#[derive(Parser)]
#[command(name = "credit")]
#[command(about = "Credit score forecast and expense breakdown client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Credit API base URL (overrides config and CREDIT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding the saved session
    #[arg(long, global = true)]
    pub session_dir: Option<PathBuf>,

    /// Config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and save the session
    Login {
        /// Account username
        username: String,

        /// Password (or set CREDIT_PASSWORD)
        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show who is logged in and where the session is stored
    Status,

    /// Show the credit score forecast
    Forecast {
        /// Center the mock fallback on this score
        #[arg(long)]
        base_score: Option<i32>,
    },

    /// Show the expense breakdown
    Expenses,

    /// Show the financial health metrics
    Health,

    /// Show profile, health, forecast and expenses together
    Dashboard {
        /// Center the mock fallback on this score
        #[arg(long)]
        base_score: Option<i32>,
    },
}
