//! Mock backend for offline use and tests
//!
//! Returns a fixed demo profile. Any username is accepted with the password
//! `demo123`; other passwords are rejected the way the real API rejects them.

use async_trait::async_trait;
use serde_json::json;

use crate::error::{AuthError, Result};
use crate::forecast::{HISTORICAL_FIELDS, PREDICTED_FIELDS};
use crate::models::{ExpenseResponse, LoginResponse, MonthlyPoint, PredictionPayload, RawCategory, Trend};

use super::CreditBackend;

/// Password the mock backend accepts
pub const DEMO_PASSWORD: &str = "demo123";

const DEMO_SCORES: [f64; 10] = [
    688.0, 691.0, 690.0, 695.0, 699.0, 702.0, 706.0, 710.0, 714.2, 718.7,
];

#[derive(Debug, Clone, Default)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CreditBackend for MockBackend {
    async fn login(&self, username: &str, password: &str) -> std::result::Result<LoginResponse, AuthError> {
        if password != DEMO_PASSWORD {
            return Err(AuthError::Rejected("Invalid username or password".to_string()));
        }
        Ok(LoginResponse {
            username: username.to_string(),
            credit_score: [710.0, 0.22, 0.31],
            financial_health: 78.4,
            monthly_income: 6500.0,
            total_debt: 18200.0,
            payment_history: Some(96.0),
            chyears: Some(7.5),
        })
    }

    async fn predict(&self, _username: &str) -> Result<PredictionPayload> {
        let mut payload = PredictionPayload::default();
        let fields = HISTORICAL_FIELDS.iter().chain(PREDICTED_FIELDS.iter());
        for (field, score) in fields.zip(DEMO_SCORES) {
            payload.insert(field, json!(score));
        }
        Ok(payload)
    }

    async fn expenses(&self, _username: &str) -> Result<ExpenseResponse> {
        let categories = vec![
            RawCategory::new("Income", 6500.0),
            RawCategory::new("Mortgage", 1850.0),
            RawCategory {
                name: "Groceries".to_string(),
                amount: 540.0,
                trend: Trend::Up,
                trend_value: 6.0,
            },
            RawCategory::new("Utilities", 310.0),
            RawCategory {
                name: "Dining".to_string(),
                amount: 260.0,
                trend: Trend::Down,
                trend_value: 3.0,
            },
            RawCategory::new("Auto Loan", 420.0),
            RawCategory::new("Entertainment", 95.0),
            RawCategory::new("Travel", 180.0),
        ];
        let monthly = ["Mar", "Apr", "May", "Jun", "Jul", "Aug"]
            .iter()
            .zip([3480.0, 3390.0, 3620.0, 3555.0, 3710.0, 3655.0])
            .map(|(month, amount)| MonthlyPoint {
                month: month.to_string(),
                amount,
            })
            .collect();

        Ok(ExpenseResponse {
            categories: Some(categories),
            monthly,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
