//! Session store
//!
//! Owns the authenticated user's profile for the lifetime of the client.
//!
//! Lifecycle:
//! 1. `restore_session` once at startup: adopt the persisted record without
//!    contacting the server (a corrupt record means no session)
//! 2. `login`: authenticate, persist, hold in memory
//! 3. `logout`: clear memory and storage unconditionally
//!
//! The store is an explicit object handed to consumers; there is no global.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{info, warn};

use crate::api::CreditBackend;
use crate::error::AuthError;
use crate::flight::{InFlight, Resource};
use crate::models::Session;
use crate::storage::SessionStorage;

pub struct SessionStore {
    backend: Arc<dyn CreditBackend>,
    storage: Arc<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
    in_flight: InFlight,
}

impl SessionStore {
    /// Create an empty store; call `restore_session` to pick up a saved login
    pub fn new(backend: Arc<dyn CreditBackend>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            backend,
            storage,
            current: RwLock::new(None),
            in_flight: InFlight::new(),
        }
    }

    /// Share an in-flight registry with other fetchers
    pub fn with_in_flight(mut self, in_flight: InFlight) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn backend(&self) -> Arc<dyn CreditBackend> {
        self.backend.clone()
    }

    /// Adopt the persisted session, if there is a readable one
    pub fn restore_session(&self) -> Option<Session> {
        let record = match self.storage.read() {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read saved session: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&record) {
            Ok(session) => {
                info!("Restored session for {}", session.username);
                self.set_current(Some(session.clone()));
                Some(session)
            }
            Err(e) => {
                warn!("Ignoring corrupt saved session: {}", e);
                None
            }
        }
    }

    /// Authenticate and persist the resulting session
    ///
    /// On failure the current session (if any) is left untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let _guard = self
            .in_flight
            .claim(Resource::Login, username)
            .ok_or_else(|| AuthError::InFlight(username.to_string()))?;

        let response = self.backend.login(username, password).await?;
        let session = Session::from_login(response, Utc::now());

        let record = serde_json::to_string(&session)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        self.storage
            .write(&record)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        info!("Logged in as {}", session.username);
        self.set_current(Some(session.clone()));
        Ok(session)
    }

    /// Forget the session in memory and on disk
    pub fn logout(&self) {
        if let Some(session) = self.current() {
            info!("Logging out {}", session.username);
        }
        self.set_current(None);
        if let Err(e) = self.storage.remove() {
            warn!("Could not remove saved session: {}", e);
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn set_current(&self, session: Option<Session>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = session;
    }
}
