//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared app context (config, backend, session store) and helpers
//! - `session` - Session commands (login, logout, status)
//! - `forecast` - Credit score forecast
//! - `expenses` - Expense breakdown
//! - `health` - Financial health metrics
//! - `dashboard` - Everything at once

pub mod core;
pub mod dashboard;
pub mod expenses;
pub mod forecast;
pub mod health;
pub mod session;

// Re-export command functions for main.rs
pub use core::*;
pub use dashboard::*;
pub use expenses::*;
pub use forecast::*;
pub use health::*;
pub use session::*;
