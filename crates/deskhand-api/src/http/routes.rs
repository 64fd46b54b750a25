//! HTTP route definitions.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::monitoring;
use crate::state::AppState;

/// Build the application router.
///
/// ```text
/// GET    /health                           - Liveness plus counters
/// GET    /capabilities                     - Operation discovery
/// POST   /invoke/{capability}/{operation}  - Invoke one operation (body = params)
/// POST   /dispatch/{operation_id}          - Invoke by "<capability>.<operation>" or meta id
/// POST   /sequence                         - Run a command sequence
/// GET    /autopress                        - Active ids and per-entry status
/// POST   /autopress                        - Start (or replace) an entry
/// DELETE /autopress                        - Stop every entry
/// DELETE /autopress/{id}                   - Stop one entry
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(monitoring::health))
        .route("/capabilities", get(handlers::list_capabilities))
        .route("/invoke/{capability}/{operation}", post(handlers::invoke))
        .route("/dispatch/{operation_id}", post(handlers::dispatch))
        .route("/sequence", post(handlers::sequence))
        .route(
            "/autopress",
            get(handlers::autopress_list)
                .post(handlers::autopress_start)
                .delete(handlers::autopress_stop_all),
        )
        .route("/autopress/{id}", delete(handlers::autopress_stop))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            monitoring::count_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
