//! Dashboard data loading
//!
//! Fetches the forecast and expense data for a logged-in user. The two
//! fetches are independent and keyed only by the session's identity.
//!
//! The forecast path never leaves the view empty: when the live fetch or the
//! dataset build fails, a mock series is returned instead, tagged with the
//! reason so the caller can show it.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::CreditBackend;
use crate::error::{Error, Result};
use crate::expenses::aggregate;
use crate::flight::{InFlight, Resource};
use crate::forecast::{build_forecast, build_mock_forecast, ForecastSummary};
use crate::health::{assess, HealthMetric};
use crate::models::{ExpenseBreakdown, ForecastPoint, Session};

/// Where a forecast came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ForecastSource {
    /// Built from the `/predict` response
    Live,
    /// Synthesized after the live path failed
    Fallback { reason: String },
}

impl ForecastSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// A forecast ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastView {
    pub points: Vec<ForecastPoint>,
    pub summary: ForecastSummary,
    #[serde(flatten)]
    pub source: ForecastSource,
}

/// Everything the dashboard shows for one user
///
/// The two fetches fail independently, so each keeps its own result.
#[derive(Debug)]
pub struct DashboardData {
    pub session: Session,
    pub health: Vec<HealthMetric>,
    pub forecast: Result<ForecastView>,
    pub expenses: Result<ExpenseBreakdown>,
}

pub struct DashboardService {
    backend: Arc<dyn CreditBackend>,
    in_flight: InFlight,
    default_base_score: i32,
    /// Fixed seed for the mock fallback; `None` uses the thread RNG
    seed: Option<u64>,
}

impl DashboardService {
    pub fn new(backend: Arc<dyn CreditBackend>) -> Self {
        Self {
            backend,
            in_flight: InFlight::new(),
            default_base_score: 720,
            seed: None,
        }
    }

    /// Share an in-flight registry (e.g. with the session store)
    pub fn with_in_flight(mut self, in_flight: InFlight) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn with_default_base_score(mut self, score: i32) -> Self {
        self.default_base_score = score;
        self
    }

    /// Make the mock fallback deterministic
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fetch and build the forecast, falling back to mock data on failure
    ///
    /// The mock is centred on `base_score` if given, else the session's
    /// credit score, else the configured default. Only a duplicate in-flight
    /// request is returned as an error.
    pub async fn forecast(&self, session: &Session, base_score: Option<i32>) -> Result<ForecastView> {
        let identity = session.identity();
        let _guard = self
            .in_flight
            .claim(Resource::Forecast, identity)
            .ok_or_else(|| Error::FetchInFlight {
                resource: Resource::Forecast.as_str(),
                identity: identity.to_string(),
            })?;

        info!("Fetching forecast for {} via {}", identity, self.backend.name());
        let live = match self.backend.predict(identity).await {
            Ok(payload) => build_forecast(&payload),
            Err(e) => Err(e),
        };

        let (points, source) = match live {
            Ok(points) => (points, ForecastSource::Live),
            Err(e) => {
                warn!("Failed to load forecast: {}; using mock data", e);
                let base = base_score
                    .or(Some(session.credit_score).filter(|s| *s > 0))
                    .unwrap_or(self.default_base_score);
                let reason = format!("Failed to load forecast: {}", e);
                (self.mock_forecast(base), ForecastSource::Fallback { reason })
            }
        };

        Ok(ForecastView {
            summary: ForecastSummary::from_points(&points),
            points,
            source,
        })
    }

    fn mock_forecast(&self, base_score: i32) -> Vec<ForecastPoint> {
        match self.seed {
            Some(seed) => build_mock_forecast(base_score, &mut StdRng::seed_from_u64(seed)),
            None => build_mock_forecast(base_score, &mut rand::thread_rng()),
        }
    }

    /// Fetch and aggregate the expense breakdown
    pub async fn expenses(&self, identity: &str) -> Result<ExpenseBreakdown> {
        let _guard = self
            .in_flight
            .claim(Resource::Expenses, identity)
            .ok_or_else(|| Error::FetchInFlight {
                resource: Resource::Expenses.as_str(),
                identity: identity.to_string(),
            })?;

        info!("Fetching expenses for {} via {}", identity, self.backend.name());
        let response = self.backend.expenses(identity).await?;
        aggregate(&response)
    }

    /// Load forecast and expenses concurrently
    pub async fn load(&self, session: &Session, base_score: Option<i32>) -> DashboardData {
        let (forecast, expenses) = tokio::join!(
            self.forecast(session, base_score),
            self.expenses(session.identity())
        );
        DashboardData {
            session: session.clone(),
            health: assess(session),
            forecast,
            expenses,
        }
    }
}
