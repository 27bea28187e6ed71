//! In-flight request tracking
//!
//! At most one request per (resource, identity) may be outstanding. A slot is
//! claimed with `InFlight::claim` and released when the returned guard drops,
//! so a cancelled future frees its slot too.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::debug;

/// Remote resources a client fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Login,
    Forecast,
    Expenses,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Forecast => "forecast",
            Self::Expenses => "expenses",
        }
    }
}

type Key = (Resource, String);

/// Shared registry of outstanding requests
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<Key>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `(resource, identity)`, or `None` if it is taken
    pub fn claim(&self, resource: Resource, identity: &str) -> Option<FlightGuard> {
        let key = (resource, identity.to_string());
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(key.clone()) {
            debug!("Rejecting duplicate {} request for {}", resource.as_str(), identity);
            return None;
        }
        Some(FlightGuard {
            active: self.active.clone(),
            key,
        })
    }

    pub fn is_active(&self, resource: Resource, identity: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(resource, identity.to_string()))
    }
}

/// Releases its slot on drop
#[derive(Debug)]
pub struct FlightGuard {
    active: Arc<Mutex<HashSet<Key>>>,
    key: Key,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}
