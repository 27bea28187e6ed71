//! Financial health assessment
//!
//! Grades the session's ratios against fixed thresholds. Each metric is
//! scored on a "lower is better" scale; for payment history and financial
//! health the value is inverted (`100 - value`) before comparison.

use serde::{Deserialize, Serialize};

use crate::models::{Session, Trend};

/// Visual tier of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    Good,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    DebtToIncome,
    CreditUtilization,
    PaymentHistory,
    FinancialHealth,
}

impl MetricKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::DebtToIncome => "Debt-to-Income Ratio",
            Self::CreditUtilization => "Credit Utilization",
            Self::PaymentHistory => "Payment History",
            Self::FinancialHealth => "Financial Health",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::DebtToIncome => "Lower is better for creditworthiness",
            Self::CreditUtilization => "Keep below 30% for optimal scores",
            Self::PaymentHistory => "Most important factor for credit score",
            Self::FinancialHealth => "Overall financial wellness score",
        }
    }

    /// `(first, second)` thresholds on the lower-is-better scale
    fn thresholds(&self) -> (f64, f64) {
        match self {
            Self::DebtToIncome => (20.0, 35.0),
            Self::CreditUtilization => (10.0, 30.0),
            Self::PaymentHistory => (5.0, 15.0),
            Self::FinancialHealth => (20.0, 40.0),
        }
    }

    fn labels(&self) -> [&'static str; 3] {
        match self {
            Self::DebtToIncome | Self::CreditUtilization => ["Excellent", "Good", "High"],
            Self::PaymentHistory => ["Excellent", "Good", "Poor"],
            Self::FinancialHealth => ["Excellent", "Good", "Fair"],
        }
    }

    /// Whether the raw value is improving the score
    fn trending_up(&self, value: f64) -> bool {
        match self {
            Self::DebtToIncome => value <= 20.0,
            Self::CreditUtilization => value <= 10.0,
            Self::PaymentHistory => value >= 95.0,
            Self::FinancialHealth => value >= 80.0,
        }
    }

    fn inverted(&self) -> bool {
        matches!(self, Self::PaymentHistory | Self::FinancialHealth)
    }
}

/// One graded metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub kind: MetricKind,
    /// Raw percentage as shown to the user
    pub value: f64,
    pub status: String,
    pub tier: HealthTier,
    pub trend: Trend,
}

impl HealthMetric {
    pub fn evaluate(kind: MetricKind, value: f64) -> Self {
        let scored = if kind.inverted() { 100.0 - value } else { value };
        let (first, second) = kind.thresholds();
        let [good, warning, danger] = kind.labels();

        let (tier, status) = if scored <= first {
            (HealthTier::Good, good)
        } else if scored <= second {
            (HealthTier::Warning, warning)
        } else {
            (HealthTier::Danger, danger)
        };

        Self {
            kind,
            value,
            status: status.to_string(),
            tier,
            trend: if kind.trending_up(value) {
                Trend::Up
            } else {
                Trend::Down
            },
        }
    }
}

/// Grade every metric the session has data for
///
/// Payment history is optional in the login response and is skipped when absent.
pub fn assess(session: &Session) -> Vec<HealthMetric> {
    let mut metrics = vec![
        HealthMetric::evaluate(MetricKind::DebtToIncome, session.debt_to_income_ratio as f64),
        HealthMetric::evaluate(MetricKind::CreditUtilization, session.credit_utilization as f64),
    ];
    if let Some(payment_history) = session.payment_history {
        metrics.push(HealthMetric::evaluate(MetricKind::PaymentHistory, payment_history));
    }
    metrics.push(HealthMetric::evaluate(
        MetricKind::FinancialHealth,
        session.financial_health,
    ));
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            name: "alice".to_string(),
            username: "alice".to_string(),
            credit_score: 710,
            credit_utilization: 22,
            debt_to_income_ratio: 31,
            financial_health: 85.0,
            monthly_income: 6500.0,
            total_debt: 18200.0,
            payment_history: None,
            credit_age: None,
            logged_in_at: None,
        }
    }

    #[test]
    fn test_debt_to_income_tiers() {
        let m = HealthMetric::evaluate(MetricKind::DebtToIncome, 20.0);
        assert_eq!(m.tier, HealthTier::Good);
        assert_eq!(m.status, "Excellent");
        assert_eq!(m.trend, Trend::Up);

        let m = HealthMetric::evaluate(MetricKind::DebtToIncome, 31.0);
        assert_eq!(m.tier, HealthTier::Warning);
        assert_eq!(m.status, "Good");
        assert_eq!(m.trend, Trend::Down);

        let m = HealthMetric::evaluate(MetricKind::DebtToIncome, 36.0);
        assert_eq!(m.tier, HealthTier::Danger);
        assert_eq!(m.status, "High");
    }

    #[test]
    fn test_inverted_metrics() {
        let m = HealthMetric::evaluate(MetricKind::PaymentHistory, 97.0);
        assert_eq!(m.tier, HealthTier::Good);
        assert_eq!(m.trend, Trend::Up);

        let m = HealthMetric::evaluate(MetricKind::PaymentHistory, 80.0);
        assert_eq!(m.tier, HealthTier::Danger);
        assert_eq!(m.status, "Poor");

        let m = HealthMetric::evaluate(MetricKind::FinancialHealth, 65.0);
        assert_eq!(m.tier, HealthTier::Warning);
        assert_eq!(m.status, "Good");
        assert_eq!(m.trend, Trend::Down);

        let m = HealthMetric::evaluate(MetricKind::FinancialHealth, 50.0);
        assert_eq!(m.status, "Fair");
    }

    #[test]
    fn test_assess_skips_missing_payment_history() {
        let metrics = assess(&session());
        let kinds: Vec<MetricKind> = metrics.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            [
                MetricKind::DebtToIncome,
                MetricKind::CreditUtilization,
                MetricKind::FinancialHealth
            ]
        );
    }

    #[test]
    fn test_assess_includes_payment_history() {
        let mut s = session();
        s.payment_history = Some(99.0);
        let metrics = assess(&s);
        assert_eq!(metrics.len(), 4);
        assert_eq!(metrics[2].kind, MetricKind::PaymentHistory);
        assert_eq!(metrics[2].status, "Excellent");
    }
}
