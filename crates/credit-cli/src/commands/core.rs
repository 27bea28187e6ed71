//! Shared command context and utilities
//!
//! This module contains:
//! - `App` - Settings, session store and dashboard service for one run
//! - `open_app` - Build the context from config, env and global flags
//! - Small output helpers shared by the commands

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use credit_core::{
    backend_from_env, CreditBackend, DashboardService, Error, FileStorage, InFlight, Session,
    SessionStore, Settings, Trend, ViewScope,
};
use serde::Serialize;
use tracing::debug;

/// Everything a command needs
pub struct App {
    pub settings: Settings,
    pub store: SessionStore,
    pub dashboard: DashboardService,
    pub session_path: PathBuf,
}

impl App {
    /// Wire a backend to file storage under `settings.session_dir` and pick
    /// up any saved session
    pub fn new(settings: Settings, backend: Arc<dyn CreditBackend>) -> Self {
        let storage = FileStorage::new(&settings.session_dir);
        let session_path = storage.path().to_path_buf();

        // Login and fetches share one registry so duplicates are caught across both
        let in_flight = InFlight::new();
        let store = SessionStore::new(backend.clone(), Arc::new(storage))
            .with_in_flight(in_flight.clone());
        store.restore_session();

        let dashboard = DashboardService::new(backend)
            .with_in_flight(in_flight)
            .with_default_base_score(settings.default_base_score);

        Self {
            settings,
            store,
            dashboard,
            session_path,
        }
    }

    /// The logged-in session, or an error telling the user to log in
    pub fn require_session(&self) -> Result<Session> {
        self.store
            .current()
            .ok_or(Error::NotAuthenticated)
            .context("Run 'credit login <username>' first")
    }
}

/// Load settings, apply flag overrides and build the app context
pub fn open_app(
    config_path: Option<&Path>,
    api_url: Option<&str>,
    session_dir: Option<&Path>,
) -> Result<App> {
    let mut settings = Settings::load(config_path).context("Failed to load config")?;
    if let Some(url) = api_url {
        settings.api.base_url = url.to_string();
    }
    if let Some(dir) = session_dir {
        settings.session_dir = dir.to_path_buf();
    }

    let backend = backend_from_env(&settings.api).context("Failed to create API backend")?;
    debug!(
        "Using {} backend at {}, session dir {}",
        backend.name(),
        settings.api.base_url,
        settings.session_dir.display()
    );
    Ok(App::new(settings, backend))
}

/// Run a fetch through `scope`, logging when its result is dropped
///
/// A CLI run opens one scope per command and never closes it, so this only
/// returns `None` when a caller closes the scope mid-fetch.
pub async fn fetch_in_view<F, T>(scope: &ViewScope, what: &str, fut: F) -> Option<T>
where
    F: Future<Output = T>,
{
    let result = scope.run(fut).await;
    if result.is_none() {
        debug!("Dropped {} result: view closed before it arrived", what);
    }
    result
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "↑",
        Trend::Down => "↓",
        Trend::Stable => "→",
    }
}

/// Format a signed change as "+5" / "-3" / "0"
pub fn signed(value: i32) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}
