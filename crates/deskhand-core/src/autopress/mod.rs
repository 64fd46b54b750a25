//! Autopress: named command sequences repeated on independent timers.
//!
//! Every entry owns a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! that its timer loop checks at the start of each tick. Once
//! [`AutopressEngine::stop`] returns, no further tick for that entry starts;
//! a tick already running finishes its current step sequence.

mod engine;
mod entry;

pub use engine::{AutopressEngine, HARD_MIN_INTERVAL_MS};
pub use entry::AutopressStatus;
