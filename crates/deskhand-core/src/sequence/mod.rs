//! Sequence engine: ordered multi-step execution with shared policy.

mod engine;
mod types;

pub use engine::SequenceEngine;
pub use types::*;
