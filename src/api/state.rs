//! Application state for the Loan Risk Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::LoanEngine;

/// Shared application state.
///
/// Holds the engine and its loaded configuration. The engine is read-only, so
/// handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<LoanEngine>,
}

impl AppState {
    /// Creates a new application state around the given engine.
    pub fn new(engine: LoanEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &LoanEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppState>();
    }
}
