//! Error types for Credit Lens

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No valid score data found in API response")]
    EmptyForecast,

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("A {resource} request for {identity} is already in flight")]
    FetchInFlight {
        resource: &'static str,
        identity: String,
    },

    #[error("No user logged in")]
    NotAuthenticated,

    #[error("Login failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else if e.is_decode() {
            Error::MalformedResponse(e.to_string())
        } else {
            Error::Network(e.to_string())
        }
    }
}

/// Failures of the login operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Non-2xx without a usable `detail` in the body
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Non-2xx carrying the server's `detail` message
    #[error("{0}")]
    Rejected(String),

    #[error("A network error occurred. Please try again. ({0})")]
    Network(String),

    #[error("Login request timed out")]
    Timeout,

    #[error("Malformed login response: {0}")]
    MalformedResponse(String),

    #[error("Could not persist session: {0}")]
    Storage(String),

    #[error("A login for {0} is already in flight")]
    InFlight(String),
}

impl AuthError {
    /// Classify a transport failure from reqwest
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AuthError::Timeout
        } else if e.is_decode() {
            AuthError::MalformedResponse(e.to_string())
        } else {
            AuthError::Network(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
