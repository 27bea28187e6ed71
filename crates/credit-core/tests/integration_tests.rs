//! Integration tests for credit-core
//!
//! These tests exercise the login → restore → dashboard workflow against the
//! offline mock backend and a file-backed session record.

use std::sync::Arc;

use credit_core::{
    assess,
    models::{ExpenseResponse, RawCategory},
    aggregate, build_forecast, DashboardService, FileStorage, ForecastSource, InFlight,
    MockBackend, PointKind, PredictionPayload, Resource, SessionStorage, SessionStore, Trend,
    ViewScope,
};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> SessionStore {
    SessionStore::new(
        Arc::new(MockBackend::new()),
        Arc::new(FileStorage::new(dir.path())),
    )
}

// =============================================================================
// Session Workflow
// =============================================================================

#[tokio::test]
async fn test_login_restore_logout_workflow() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let store = store_in(&dir);
    assert!(store.restore_session().is_none());

    let session = store
        .login("demo", "demo123")
        .await
        .expect("Login should succeed");
    assert!(dir.path().join("user.json").exists());

    // Next process start
    let restarted = store_in(&dir);
    assert_eq!(restarted.restore_session(), Some(session));

    restarted.logout();
    assert!(!dir.path().join("user.json").exists());
    assert!(store_in(&dir).restore_session().is_none());
}

#[tokio::test]
async fn test_rejected_login_leaves_no_record() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let err = store.login("demo", "letmein").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid username or password");

    let storage = FileStorage::new(dir.path());
    assert!(storage.read().unwrap().is_none());
}

#[test]
fn test_truncated_record_is_ignored() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.write(r#"{"name":"demo","username":"de"#).unwrap();

    let store = store_in(&dir);
    assert!(store.restore_session().is_none());
    assert!(!store.is_authenticated());
}

// =============================================================================
// Dashboard Workflow
// =============================================================================

#[tokio::test]
async fn test_dashboard_after_login() {
    let dir = TempDir::new().unwrap();
    let in_flight = InFlight::new();
    let store = store_in(&dir).with_in_flight(in_flight.clone());
    let session = store.login("demo", "demo123").await.unwrap();

    let service = DashboardService::new(store.backend()).with_in_flight(in_flight.clone());
    let data = service.load(&session, None).await;

    let forecast = data.forecast.expect("forecast");
    assert_eq!(forecast.source, ForecastSource::Live);
    assert_eq!(forecast.points.len(), 10);
    assert_eq!(forecast.points[7].kind, PointKind::Historical);
    assert_eq!(forecast.points[7].predicted, Some(forecast.points[7].score));

    let expenses = data.expenses.expect("expenses");
    let sum: f64 = expenses.categories.iter().map(|c| c.amount).sum();
    assert_eq!(sum, expenses.total_expenses);
    assert_eq!(data.health, assess(&session));

    // Guards are released when the fetches finish
    assert!(!in_flight.is_active(Resource::Forecast, "demo"));
    assert!(!in_flight.is_active(Resource::Expenses, "demo"));
}

#[tokio::test]
async fn test_view_scope_drops_results_after_close() {
    let service = DashboardService::new(Arc::new(MockBackend::new()));
    let scope = ViewScope::new();

    let first = scope.run(service.expenses("demo")).await;
    assert!(first.is_some());

    scope.close();
    let second = scope.run(service.expenses("demo")).await;
    assert!(second.is_none());
}

// =============================================================================
// Pure Transforms
// =============================================================================

#[test]
fn test_partial_prediction_payload() {
    let mut payload = PredictionPayload::default();
    payload.insert("score_of_3_months_ago", 690);
    payload.insert("score_of_2_months_ago", "n/a");
    payload.insert("score_of_last_month", 701.4);
    payload.insert("next_month_score", 705.5);

    let points = build_forecast(&payload).unwrap();
    let scores: Vec<i32> = points.iter().map(|p| p.score).collect();
    assert_eq!(scores, vec![690, 701, 706]);
    assert_eq!(points[1].predicted, Some(701));
    assert_eq!(points[2].confidence_upper, Some(721));
    assert_eq!(points[2].confidence_lower, Some(691));
}

#[test]
fn test_expense_grouping_with_minor_categories() {
    let mut groceries = RawCategory::new("Groceries", 400.0);
    groceries.trend = Trend::Up;
    groceries.trend_value = 4.0;

    let response = ExpenseResponse {
        categories: Some(vec![
            RawCategory::new("Income", 5000.0),
            RawCategory::new("Mortgage", 1200.0),
            groceries,
            RawCategory::new("Pets", 150.0),
            RawCategory::new("Gifts", 50.0),
        ]),
        monthly: vec![],
    };

    let breakdown = aggregate(&response).unwrap();
    let names: Vec<&str> = breakdown.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Mortgage", "Groceries", "Other"]);
    assert_eq!(breakdown.total_expenses, 1800.0);

    let other = &breakdown.categories[2];
    assert_eq!(other.amount, 200.0);
    assert_eq!(other.trend, Trend::Stable);
    assert_eq!(other.color, "#6b7280");
}
