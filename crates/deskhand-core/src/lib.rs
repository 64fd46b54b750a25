//! # Deskhand Core
//!
//! The action-routing and sequencing core.
//!
//! ## Components
//!
//! - [`CapabilityRegistry`] - Name-keyed store of capability handlers
//! - [`SequenceEngine`] - Ordered multi-step execution with shared policy
//! - [`AutopressEngine`] - Named command sequences repeated on independent timers
//! - [`Router`] - Maps inbound operation identifiers onto capabilities and engines
//!
//! Every engine shares one [`TargetContext`](deskhand_protocols::TargetContext)
//! handle, created by whoever builds the [`Router`].

pub mod autopress;
pub mod registry;
pub mod router;
pub mod sequence;

#[cfg(test)]
pub(crate) mod testing;

pub use autopress::{AutopressEngine, AutopressStatus, HARD_MIN_INTERVAL_MS};
pub use registry::CapabilityRegistry;
pub use router::{
    AutopressStartRequest, AutopressStopRequest, META_OPERATIONS, OperationListing, Router,
    RouterLimits,
};
pub use sequence::{
    SequenceCommand, SequenceEngine, SequencePolicy, SequenceRecord, SequenceRequest,
    SequenceStatus, StepOutcome,
};
