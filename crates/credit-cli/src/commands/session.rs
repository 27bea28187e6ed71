//! Session command implementations (login, logout, status)

use anyhow::{bail, Context, Result};
use chrono::Local;
use serde_json::json;

use super::{print_json, App};
use crate::cli::PASSWORD_ENV;

pub async fn cmd_login(app: &App, username: &str, password: Option<&str>, json: bool) -> Result<()> {
    let Some(password) = password.filter(|p| !p.is_empty()) else {
        bail!("No password given. Use --password or set {}", PASSWORD_ENV);
    };

    let session = app
        .store
        .login(username, password)
        .await
        .context("Login failed")?;

    if json {
        return print_json(&session);
    }

    println!();
    println!("✅ Logged in as {}", session.name);
    println!("   Credit score:       {}", session.credit_score);
    println!("   Credit utilization: {}%", session.credit_utilization);
    println!("   Debt-to-income:     {}%", session.debt_to_income_ratio);
    println!();
    println!("   Session saved to {}", app.session_path.display());
    println!();
    Ok(())
}

pub fn cmd_logout(app: &App, json: bool) -> Result<()> {
    let previous = app.store.current();
    app.store.logout();

    if json {
        return print_json(&json!({
            "loggedOut": previous.as_ref().map(|s| s.username.as_str()),
        }));
    }

    match previous {
        Some(session) => println!("👋 Logged out {}", session.username),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn cmd_status(app: &App, json: bool) -> Result<()> {
    let session = app.store.current();

    if json {
        return print_json(&json!({
            "authenticated": session.is_some(),
            "session": session,
            "apiUrl": app.settings.api.base_url,
            "backend": app.store.backend().name(),
            "sessionFile": app.session_path,
        }));
    }

    println!();
    println!("📊 Credit Lens Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   API:      {} ({})", app.settings.api.base_url, app.store.backend().name());
    println!("   Session:  {}", app.session_path.display());

    match session {
        Some(session) => {
            println!();
            println!("   🔓 Logged in as {}", session.username);
            if let Some(at) = session.logged_in_at {
                println!(
                    "      since {}",
                    at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                );
            }
            println!("      Credit score: {}", session.credit_score);
        }
        None => {
            println!();
            println!("   🔒 Not logged in");
            println!("      Run 'credit login <username>' to sign in");
        }
    }

    println!();
    Ok(())
}
