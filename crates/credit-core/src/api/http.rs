//! HTTP backend for the credit API
//!
//! Endpoints:
//! - `POST /login` with `{username, password}`
//! - `POST /predict` with `{username}`
//! - `GET /api/expenses?username=<id>`
//!
//! Every request is bounded by the configured timeout; expiry surfaces as
//! `Error::Timeout` (or `AuthError::Timeout` for login).

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiSettings;
use crate::error::{AuthError, Error, Result};
use crate::models::{ErrorBody, ExpenseResponse, LoginRequest, LoginResponse, PredictionPayload};

use super::CreditBackend;

/// Credit API over HTTP
#[derive(Clone)]
pub struct HttpBackend {
    http_client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend with the given connection settings
    pub fn new(api: &ApiSettings) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(api.timeout)
            .connect_timeout(api.connect_timeout)
            .build()?;
        Ok(Self {
            http_client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a backend for `base_url` with default timeouts
    pub fn with_url(base_url: &str) -> Result<Self> {
        Self::new(&ApiSettings {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    username: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    prediction: Option<Value>,
}

/// Turn a non-2xx response into an `Error::Api`, preferring the body's `detail`
async fn api_error(response: Response) -> Error {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.message(),
        Err(_) if !text.trim().is_empty() => Some(text),
        Err(_) => None,
    }
    .unwrap_or_else(|| format!("HTTP error! status: {}", status));
    warn!("API error {}: {}", status, message);
    Error::Api { status, message }
}

/// Extract the prediction map, surfacing an `{error}` payload as an error
fn parse_prediction(body: PredictResponse) -> Result<PredictionPayload> {
    let prediction = match body.prediction {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => {
            return Err(Error::MalformedResponse(
                "missing prediction data".to_string(),
            ))
        }
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "prediction is not an object: {}",
                other
            )))
        }
    };

    if let Some(error) = prediction.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(Error::Prediction(message));
    }

    Ok(PredictionPayload::from(prediction))
}

#[async_trait]
impl CreditBackend for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> std::result::Result<LoginResponse, AuthError> {
        debug!("POST /login for {}", username);
        let response = self
            .http_client
            .post(self.url("/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(AuthError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body: Option<ErrorBody> = response.json().await.ok();
            let error = match body.and_then(|b| b.message()) {
                Some(detail) => AuthError::Rejected(detail),
                None => AuthError::InvalidCredentials,
            };
            warn!("Login rejected for {} ({}): {}", username, status, error);
            return Err(error);
        }

        response
            .json::<LoginResponse>()
            .await
            .map_err(AuthError::from_transport)
    }

    async fn predict(&self, username: &str) -> Result<PredictionPayload> {
        debug!("POST /predict for {}", username);
        let response = self
            .http_client
            .post(self.url("/predict"))
            .json(&PredictRequest { username })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: PredictResponse = response.json().await?;
        parse_prediction(body)
    }

    async fn expenses(&self, username: &str) -> Result<ExpenseResponse> {
        debug!("GET /api/expenses for {}", username);
        let response = self
            .http_client
            .get(self.url("/api/expenses"))
            .query(&[("username", username)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
