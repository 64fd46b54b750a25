//! Application state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use deskhand_core::Router;

/// State shared across handlers.
pub struct AppState {
    pub router: Arc<Router>,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskhand_core::CapabilityRegistry;

    #[test]
    fn test_request_count() {
        let state = AppState::new(Arc::new(Router::new(Arc::new(CapabilityRegistry::new()))));
        assert_eq!(state.request_count(), 0);

        state.increment_requests();
        state.increment_requests();
        assert_eq!(state.request_count(), 2);
    }
}
