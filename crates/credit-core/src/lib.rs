//! Credit Lens Core Library
//!
//! Shared functionality for the Credit Lens credit profile client:
//! - Session store with persisted login (restore, login, logout)
//! - Credit API backends (HTTP and offline mock)
//! - Forecast dataset builder with mock fallback
//! - Expense aggregation into display categories
//! - Financial health grading
//! - Single-flight fetch tracking and view-scoped result delivery

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod expenses;
pub mod flight;
pub mod forecast;
pub mod health;
pub mod models;
pub mod scope;
pub mod session;
pub mod storage;

/// Test utilities including mock credit API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::{backend_for, backend_from_env, CreditBackend, HttpBackend, MockBackend};
pub use config::{ApiSettings, Settings};
pub use dashboard::{DashboardData, DashboardService, ForecastSource, ForecastView};
pub use error::{AuthError, Error, Result};
pub use expenses::aggregate;
pub use flight::{FlightGuard, InFlight, Resource};
pub use forecast::{build_forecast, build_mock_forecast, ForecastSummary};
pub use health::{assess, HealthMetric, HealthTier, MetricKind};
pub use models::{
    ExpenseBreakdown, ExpenseCategory, ExpenseResponse, ForecastPoint, LoginResponse,
    MonthlyPoint, PointKind, PredictionPayload, RawCategory, Session, Trend,
};
pub use scope::{ScopeTicket, ViewScope};
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
