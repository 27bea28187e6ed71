//! Pluggable credit API backend
//!
//! # Architecture
//!
//! - `CreditBackend` trait: the three remote operations the client needs
//! - `HttpBackend`: talks to the real service over HTTP (reqwest)
//! - `MockBackend`: canned demo data, no network
//!
//! # Configuration
//!
//! Environment variables:
//! - `CREDIT_BACKEND`: Backend to use (http, mock). Default: http
//! - `CREDIT_API_URL`: API base URL for the http backend

mod http;
mod mock;

pub use http::HttpBackend;
pub use mock::MockBackend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ApiSettings;
use crate::error::{AuthError, Result};
use crate::models::{ExpenseResponse, LoginResponse, PredictionPayload};

/// Environment variable selecting the backend
pub const BACKEND_ENV: &str = "CREDIT_BACKEND";

/// Remote operations behind the session store and dashboard
///
/// Backends must be Send + Sync so they can be shared across tasks.
#[async_trait]
pub trait CreditBackend: Send + Sync {
    /// Exchange credentials for the user's profile
    async fn login(&self, username: &str, password: &str) -> std::result::Result<LoginResponse, AuthError>;

    /// Fetch the `prediction` object for a user
    async fn predict(&self, username: &str) -> Result<PredictionPayload>;

    /// Fetch the raw expense categories and monthly series for a user
    async fn expenses(&self, username: &str) -> Result<ExpenseResponse>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Build the backend selected by `CREDIT_BACKEND`
pub fn backend_from_env(api: &ApiSettings) -> Result<Arc<dyn CreditBackend>> {
    let kind = std::env::var(BACKEND_ENV).unwrap_or_else(|_| "http".to_string());
    backend_for(&kind, api)
}

/// Build a backend by name
pub fn backend_for(kind: &str, api: &ApiSettings) -> Result<Arc<dyn CreditBackend>> {
    match kind.to_lowercase().as_str() {
        "mock" => Ok(Arc::new(MockBackend::new())),
        "http" | "" => Ok(Arc::new(HttpBackend::new(api)?)),
        other => Err(crate::error::Error::Config(format!(
            "Unknown backend '{}' (expected http or mock)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for() {
        let api = ApiSettings::default();
        assert_eq!(backend_for("mock", &api).unwrap().name(), "mock");
        assert_eq!(backend_for("HTTP", &api).unwrap().name(), "http");
        assert!(backend_for("carrier-pigeon", &api).is_err());
    }
}
