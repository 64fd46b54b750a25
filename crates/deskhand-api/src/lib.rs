//! # Deskhand API
//!
//! HTTP surface over the deskhand [`Router`](deskhand_core::Router).
//!
//! ```text
//! GET    /health
//! GET    /capabilities
//! POST   /invoke/{capability}/{operation}
//! POST   /dispatch/{operation_id}
//! POST   /sequence
//! GET    /autopress
//! POST   /autopress
//! DELETE /autopress
//! DELETE /autopress/{id}
//! ```
//!
//! Invoke, dispatch and sequence calls always answer `200 OK`; failures are
//! carried in the body as `success: false` with a structured `error`.

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::InterfaceError;
pub use http::routes::create_router;
pub use server::{InterfaceConfig, InterfaceServer};
pub use state::AppState;
