//! Router-facing request and listing types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use deskhand_protocols::{CapabilityCategory, SideEffect};

use crate::autopress::HARD_MIN_INTERVAL_MS;
use crate::sequence::SequenceCommand;

/// Identifiers handled by the router itself rather than a capability.
pub const META_OPERATIONS: &[&str] = &[
    "execute_sequence",
    "autopress_start",
    "autopress_stop",
    "autopress_list",
    "autopress_status",
];

/// Bounds applied to caller-supplied timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterLimits {
    /// Largest accepted `delay_between_ms` for a sequence.
    pub max_sequence_delay_ms: u64,
    /// Smallest accepted autopress interval.
    pub min_autopress_interval_ms: u64,
}

impl Default for RouterLimits {
    fn default() -> Self {
        Self {
            max_sequence_delay_ms: 60_000,
            min_autopress_interval_ms: HARD_MIN_INTERVAL_MS,
        }
    }
}

/// One discoverable operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationListing {
    pub capability: String,
    pub category: CapabilityCategory,
    pub operation: String,
    pub description: String,
    pub parameters_schema: Value,
    pub side_effect: SideEffect,
}

impl OperationListing {
    /// Identifier accepted by [`Router::dispatch`](super::Router::dispatch).
    pub fn operation_id(&self) -> String {
        format!("{}.{}", self.capability, self.operation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutopressStartRequest {
    pub id: String,
    pub commands: Vec<SequenceCommand>,
    pub interval_ms: u64,
}

/// Stop one entry, or every entry when `id` is omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutopressStopRequest {
    #[serde(default)]
    pub id: Option<String>,
}
