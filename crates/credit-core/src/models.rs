//! Domain models for Credit Lens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ========== Session ==========

/// The authenticated user's credit profile
///
/// Serialized in camelCase; this is also the on-disk format of the
/// persisted session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Display name (the API only returns the username)
    pub name: String,
    /// Identity used as the key for every downstream call
    pub username: String,
    pub credit_score: i32,
    /// Percentage, 0-100
    pub credit_utilization: i32,
    /// Percentage, 0-100
    pub debt_to_income_ratio: i32,
    pub financial_health: f64,
    pub monthly_income: f64,
    pub total_debt: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_history: Option<f64>,
    /// Average credit age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Build a session from a successful login response
    ///
    /// Utilization and debt-to-income arrive as fractions and are stored as
    /// rounded percentages.
    pub fn from_login(response: LoginResponse, logged_in_at: DateTime<Utc>) -> Self {
        let [score, utilization, dti] = response.credit_score;
        Self {
            name: response.username.clone(),
            username: response.username,
            credit_score: score.round() as i32,
            credit_utilization: to_percent(utilization),
            debt_to_income_ratio: to_percent(dti),
            financial_health: response.financial_health,
            monthly_income: response.monthly_income,
            total_debt: response.total_debt,
            payment_history: response.payment_history,
            credit_age: response.chyears,
            logged_in_at: Some(logged_in_at),
        }
    }

    pub fn identity(&self) -> &str {
        &self.username
    }
}

fn to_percent(ratio: f64) -> i32 {
    (ratio * 100.0).round() as i32
}

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful `POST /login` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    /// `[score, utilization, debt_to_income]`, the last two as fractions
    pub credit_score: [f64; 3],
    #[serde(deserialize_with = "lenient_f64")]
    pub financial_health: f64,
    pub monthly_income: f64,
    pub total_debt: f64,
    #[serde(default)]
    pub payment_history: Option<f64>,
    #[serde(default)]
    pub chyears: Option<f64>,
}

/// Error body returned by the API on non-2xx
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The `detail` field as a message, if present
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Accepts a JSON number or a numeric string
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    numeric(&value).ok_or_else(|| serde::de::Error::custom(format!("not a number: {}", value)))
}

/// Read a JSON value as a finite number, parsing numeric strings
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

// ========== Forecast ==========

/// The `prediction` object returned by `POST /predict`
///
/// Kept as a raw map: any of the score fields may be missing, null, or a
/// numeric string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionPayload(pub Map<String, Value>);

impl PredictionPayload {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_string(), value.into());
    }
}

impl From<Map<String, Value>> for PredictionPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Whether a forecast point comes from records or from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Historical,
    Predicted,
}

impl PointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Historical => "Historical",
            Self::Predicted => "Predicted",
        }
    }
}

impl std::fmt::Display for PointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One month on the forecast chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub month: String,
    pub score: i32,
    pub historical: Option<i32>,
    /// Also set on the last historical point so the two lines connect
    pub predicted: Option<i32>,
    pub confidence_upper: Option<i32>,
    pub confidence_lower: Option<i32>,
    #[serde(rename = "type")]
    pub kind: PointKind,
}

impl ForecastPoint {
    pub fn has_band(&self) -> bool {
        self.confidence_upper.is_some() && self.confidence_lower.is_some()
    }
}

// ========== Expenses ==========

/// Direction of a category's spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

impl std::str::FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "stable" => Ok(Self::Stable),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category as returned by `GET /api/expenses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default, alias = "trend_value")]
    pub trend_value: f64,
}

impl RawCategory {
    pub fn new(name: &str, amount: f64) -> Self {
        Self {
            name: name.to_string(),
            amount,
            trend: Trend::Stable,
            trend_value: 0.0,
        }
    }
}

/// One bar of the monthly spending chart (passed through untouched)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub amount: f64,
}

/// `GET /api/expenses` response
///
/// `categories` is optional here so its absence can be reported as a
/// malformed response instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseResponse {
    #[serde(default)]
    pub categories: Option<Vec<RawCategory>>,
    #[serde(default)]
    pub monthly: Vec<MonthlyPoint>,
}

/// A category ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub name: String,
    pub amount: f64,
    pub percentage: f64,
    pub trend: Trend,
    pub trend_value: f64,
    pub color: String,
}

/// Aggregated expenses for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBreakdown {
    pub categories: Vec<ExpenseCategory>,
    pub monthly: Vec<MonthlyPoint>,
    pub total_expenses: f64,
}
