//! View-scoped result application
//!
//! A `ViewScope` belongs to one consumer instance (a view, a CLI command).
//! Each fetch run through `ViewScope::run` is stamped with a generation;
//! its result is handed back only if the scope is still open and no newer
//! fetch has started in the meantime. Late results are dropped.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

#[derive(Debug, Default)]
struct ScopeState {
    generation: AtomicU64,
    closed: AtomicBool,
}

#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    state: Arc<ScopeState>,
}

/// Stamp for one fetch inside a scope
#[derive(Debug, Clone)]
pub struct ScopeTicket {
    state: Arc<ScopeState>,
    generation: u64,
}

impl ScopeTicket {
    /// True while the scope is open and this is the latest fetch
    pub fn is_current(&self) -> bool {
        !self.state.closed.load(Ordering::SeqCst)
            && self.state.generation.load(Ordering::SeqCst) == self.generation
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, superseding any earlier one
    pub fn begin(&self) -> ScopeTicket {
        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        ScopeTicket {
            state: self.state.clone(),
            generation,
        }
    }

    /// Close the scope; results still in flight will be discarded
    pub fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        !self.state.closed.load(Ordering::SeqCst)
    }

    /// Run `fut` and return its output only if it is still wanted
    pub async fn run<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin();
        let output = fut.await;
        if ticket.is_current() {
            Some(output)
        } else {
            debug!("Discarding stale result (generation {})", ticket.generation);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_result_applied_while_open() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 42 }).await, Some(42));
    }

    #[tokio::test]
    async fn test_result_discarded_after_close() {
        let scope = ViewScope::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let view = scope.clone();
        let handle = tokio::spawn(async move { view.run(async { rx.await.unwrap() }).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        scope.close();
        tx.send(7).unwrap();

        assert_eq!(handle.await.unwrap(), None);
        assert!(!scope.is_open());
    }

    #[tokio::test]
    async fn test_newer_fetch_supersedes_older() {
        let scope = ViewScope::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let view = scope.clone();
        let slow = tokio::spawn(async move { view.run(async { rx.await.unwrap() }).await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Retry while the first fetch is still pending
        assert_eq!(scope.run(async { 2 }).await, Some(2));
        tx.send(1).unwrap();
        assert_eq!(slow.await.unwrap(), None);
    }

    #[test]
    fn test_ticket_invalidated_by_begin() {
        let scope = ViewScope::new();
        let first = scope.begin();
        assert!(first.is_current());
        let second = scope.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }
}
