//! Snapshot, autopress and sequence settings.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Post-action snapshot policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Attach a snapshot to mutating input operations.
    #[serde(default = "default_true")]
    pub after_action: bool,

    /// Pixel budget; larger captures are scaled down preserving aspect ratio.
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            after_action: true,
            max_pixels: default_max_pixels(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_max_pixels() -> u64 {
    1_000_000
}

fn default_jpeg_quality() -> u8 {
    75
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopressConfig {
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl Default for AutopressConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

fn default_min_interval_ms() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Upper bound for `delay_between_ms`.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_delay_ms() -> u64 {
    60_000
}
