//! Test utilities for credit-core
//!
//! This module provides a mock credit API server that can be used for
//! development and integration tests. It serves `/login`, `/predict` and
//! `/api/expenses` with configurable bodies, status codes and latency.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Password the mock server accepts for any username
pub const MOCK_PASSWORD: &str = "demo123";

/// Canned behaviour of the mock server
#[derive(Debug, Clone)]
pub struct MockApi {
    /// `credit_score` field of a successful login
    pub credit_score: Value,
    /// Force `/login` to answer with this status and raw body
    pub login_error: Option<(u16, String)>,
    /// Body of `/predict`
    pub prediction: Value,
    pub predict_status: u16,
    /// Body of `/api/expenses`
    pub expenses: Value,
    pub expenses_status: u16,
    /// Latency added to every request
    pub delay: Duration,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            credit_score: json!([710, 0.22, 0.31]),
            login_error: None,
            prediction: json!({
                "prediction": {
                    "score_of_8_months_ago": 680,
                    "score_of_7_months_ago": 684,
                    "score_of_6_months_ago": 690,
                    "score_of_5_months_ago": 688,
                    "score_of_4_months_ago": 695,
                    "score_of_3_months_ago": 701,
                    "score_of_2_months_ago": 704,
                    "score_of_last_month": 710,
                    "next_month_score": 715.6,
                    "following_month_score": 721.2
                }
            }),
            predict_status: 200,
            expenses: json!({
                "categories": [
                    {"name": "Income", "amount": 6500},
                    {"name": "Mortgage", "amount": 1800, "trend": "stable", "trendValue": 0},
                    {"name": "Groceries", "amount": 450, "trend": "up", "trendValue": 5},
                    {"name": "Dining", "amount": 220, "trend": "down", "trendValue": 2},
                    {"name": "Entertainment", "amount": 80},
                    {"name": "Travel", "amount": 150}
                ],
                "monthly": [
                    {"month": "Jul", "amount": 2700},
                    {"month": "Aug", "amount": 2700}
                ]
            }),
            expenses_status: 200,
            delay: Duration::ZERO,
        }
    }
}

struct MockState {
    api: MockApi,
    hits: AtomicUsize,
    last_username: Mutex<Option<String>>,
}

impl MockState {
    async fn hit(&self, username: &str) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        *self.last_username.lock().unwrap() = Some(username.to_string());
        if !self.api.delay.is_zero() {
            tokio::time::sleep(self.api.delay).await;
        }
    }
}

/// Mock credit API server for testing and development
pub struct MockCreditServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockCreditServer {
    /// Start the mock server with default responses on an available port
    pub async fn start() -> Self {
        Self::start_with(MockApi::default()).await
    }

    /// Start the mock server with custom responses
    pub async fn start_with(api: MockApi) -> Self {
        let state = Arc::new(MockState {
            api,
            hits: AtomicUsize::new(0),
            last_username: Mutex::new(None),
        });

        let app = Router::new()
            .route("/login", post(handle_login))
            .route("/predict", post(handle_predict))
            .route("/api/expenses", get(handle_expenses))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received so far
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Username of the most recent request
    pub fn last_username(&self) -> Option<String> {
        self.state.last_username.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockCreditServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct UsernameBody {
    username: String,
}

#[derive(Debug, Deserialize)]
struct UsernameQuery {
    #[serde(default)]
    username: String,
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

async fn handle_login(State(state): State<Arc<MockState>>, Json(body): Json<LoginBody>) -> Response {
    state.hit(&body.username).await;

    if let Some((code, raw)) = &state.api.login_error {
        return (status(*code), [(header::CONTENT_TYPE, "text/plain")], raw.clone()).into_response();
    }

    if body.password != MOCK_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "bad password"})),
        )
            .into_response();
    }

    Json(json!({
        "username": body.username,
        "credit_score": state.api.credit_score,
        "financial_health": 78.4,
        "monthly_income": 6500,
        "total_debt": 18200,
        "payment_history": 96
    }))
    .into_response()
}

async fn handle_predict(
    State(state): State<Arc<MockState>>,
    Json(body): Json<UsernameBody>,
) -> Response {
    state.hit(&body.username).await;
    (status(state.api.predict_status), Json(state.api.prediction.clone())).into_response()
}

async fn handle_expenses(
    State(state): State<Arc<MockState>>,
    Query(query): Query<UsernameQuery>,
) -> Response {
    state.hit(&query.username).await;
    (status(state.api.expenses_status), Json(state.api.expenses.clone())).into_response()
}
