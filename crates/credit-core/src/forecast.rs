//! Forecast dataset construction
//!
//! Turns the `/predict` payload into the ten-month chart series:
//! - 8 historical months followed by 2 predicted months
//! - the last historical point doubles as the first point of the predicted
//!   line so the two lines connect
//! - confidence bands of ±15 around predicted points, clamped to the score range
//!
//! `build_mock_forecast` produces a series of the same shape from random noise
//! and is used when the live fetch fails.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{numeric, ForecastPoint, PointKind, PredictionPayload};

pub const MIN_SCORE: i32 = 300;
pub const MAX_SCORE: i32 = 850;

/// Half-width of the confidence band around predicted points
pub const CONFIDENCE_OFFSET: i32 = 15;

/// Historical score fields, oldest first
pub const HISTORICAL_FIELDS: [&str; 8] = [
    "score_of_8_months_ago",
    "score_of_7_months_ago",
    "score_of_6_months_ago",
    "score_of_5_months_ago",
    "score_of_4_months_ago",
    "score_of_3_months_ago",
    "score_of_2_months_ago",
    "score_of_last_month",
];

/// Predicted score fields, nearest first
pub const PREDICTED_FIELDS: [&str; 2] = ["next_month_score", "following_month_score"];

/// Fixed timeline: Jan 2025 - Aug 2025 historical, Sep - Oct 2025 predicted
pub const MONTH_LABELS: [&str; 10] = [
    "Jan 25", "Feb 25", "Mar 25", "Apr 25", "May 25", "Jun 25", "Jul 25", "Aug 25", "Sep 25",
    "Oct 25",
];

/// Number of historical months in the mock series
const MOCK_HISTORICAL: usize = 8;

/// Label for the point at `index` (0-based)
pub fn month_label(index: usize) -> String {
    MONTH_LABELS
        .get(index)
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Month {}", index + 1))
}

/// Clamp a score into the valid range
pub fn clamp_score(score: i32) -> i32 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Read one score field: rounded when numeric, `None` when absent or unusable
///
/// Zero is treated as missing; it is what the API sends for an empty month.
/// Anything else is pulled into the valid score range.
fn read_score(payload: &PredictionPayload, field: &str) -> Option<i32> {
    let value = numeric(payload.get(field)?)?;
    if value == 0.0 {
        return None;
    }
    Some(value.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as i32)
}

/// Build the chart series from a prediction payload
pub fn build_forecast(payload: &PredictionPayload) -> Result<Vec<ForecastPoint>> {
    let historical: Vec<i32> = HISTORICAL_FIELDS
        .iter()
        .filter_map(|field| read_score(payload, field))
        .collect();
    let predicted: Vec<i32> = PREDICTED_FIELDS
        .iter()
        .filter_map(|field| read_score(payload, field))
        .collect();

    debug!(
        "Forecast payload: {} historical, {} predicted scores",
        historical.len(),
        predicted.len()
    );

    build_forecast_from_scores(&historical, &predicted)
}

/// Assemble historical scores followed by predicted scores
///
/// Labels are consumed in order, so missing months shift later points left
/// rather than leaving gaps.
pub fn build_forecast_from_scores(historical: &[i32], predicted: &[i32]) -> Result<Vec<ForecastPoint>> {
    if historical.is_empty() && predicted.is_empty() {
        return Err(Error::EmptyForecast);
    }

    let scores = historical.iter().chain(predicted.iter()).copied();
    Ok(scores
        .enumerate()
        .map(|(index, score)| assemble_point(index, score, historical.len()))
        .collect())
}

/// Build a single point given how many of the leading points are historical
fn assemble_point(index: usize, score: i32, historical_count: usize) -> ForecastPoint {
    let is_historical = index < historical_count;
    let is_last_historical = historical_count > 0 && index == historical_count - 1;
    let on_predicted_line = !is_historical || is_last_historical;

    ForecastPoint {
        month: month_label(index),
        score,
        historical: is_historical.then_some(score),
        predicted: on_predicted_line.then_some(score),
        confidence_upper: on_predicted_line
            .then(|| score.saturating_add(CONFIDENCE_OFFSET).min(MAX_SCORE)),
        confidence_lower: on_predicted_line
            .then(|| score.saturating_sub(CONFIDENCE_OFFSET).max(MIN_SCORE)),
        kind: if is_historical {
            PointKind::Historical
        } else {
            PointKind::Predicted
        },
    }
}

/// Generate a plausible ten-month series around `base_score`
///
/// Historical months trend up by 3 points a month into the base score with
/// ±5 noise; predicted months climb 5 points a month with ±4 noise. The
/// random source is injected so callers can seed it.
pub fn build_mock_forecast<R: Rng + ?Sized>(base_score: i32, rng: &mut R) -> Vec<ForecastPoint> {
    let last_historical = MOCK_HISTORICAL as i32 - 1;

    (0..MONTH_LABELS.len())
        .map(|index| {
            let i = index as i32;
            let raw = if index < MOCK_HISTORICAL {
                base_score as f64 - ((last_historical - i) * 3) as f64 + rng.gen_range(-5.0..=5.0)
            } else {
                base_score as f64 + ((i - last_historical) * 5) as f64 + rng.gen_range(-4.0..=4.0)
            };
            let score = clamp_score(raw.round() as i32);
            assemble_point(index, score, MOCK_HISTORICAL)
        })
        .collect()
}

/// Headline numbers shown above the forecast chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Last historical score minus the first
    pub historical_trend: i32,
    /// Final predicted score minus the last historical score
    pub predicted_change: i32,
    pub final_prediction: Option<i32>,
    pub historical_months: usize,
    pub predicted_months: usize,
}

impl ForecastSummary {
    pub fn from_points(points: &[ForecastPoint]) -> Self {
        let historical: Vec<i32> = points
            .iter()
            .filter(|p| p.kind == PointKind::Historical)
            .map(|p| p.score)
            .collect();
        let predicted: Vec<i32> = points
            .iter()
            .filter(|p| p.kind == PointKind::Predicted)
            .map(|p| p.score)
            .collect();

        let historical_trend = match (historical.first(), historical.last()) {
            (Some(first), Some(last)) if historical.len() > 1 => last - first,
            _ => 0,
        };
        let predicted_change = match (predicted.last(), historical.last()) {
            (Some(final_score), Some(last)) => final_score - last,
            _ => 0,
        };

        Self {
            historical_trend,
            predicted_change,
            final_prediction: predicted.last().copied(),
            historical_months: historical.len(),
            predicted_months: predicted.len(),
        }
    }
}
