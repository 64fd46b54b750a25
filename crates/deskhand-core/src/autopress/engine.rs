//! Autopress engine - lifecycle of repeating entries.

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::{debug, info};

use deskhand_protocols::{ActionError, TargetContext};

use super::entry::{AutopressEntry, AutopressStatus};
use crate::sequence::{SequenceCommand, SequenceEngine};

/// Smallest interval any entry may run at, in milliseconds.
pub const HARD_MIN_INTERVAL_MS: u64 = 10;

/// Runs named command sequences on independent timers.
///
/// Entries are keyed by id. Starting an id that is already running replaces
/// it. All entries are cancelled when the engine is dropped.
pub struct AutopressEngine {
    sequence: SequenceEngine,
    targets: TargetContext,
    min_interval_ms: u64,
    entries: Mutex<BTreeMap<String, AutopressEntry>>,
}

impl AutopressEngine {
    pub fn new(sequence: SequenceEngine, targets: TargetContext) -> Self {
        Self {
            sequence,
            targets,
            min_interval_ms: HARD_MIN_INTERVAL_MS,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Raise the minimum accepted interval. Values below
    /// [`HARD_MIN_INTERVAL_MS`] are clamped up to it.
    pub fn with_min_interval(mut self, min_interval_ms: u64) -> Self {
        self.min_interval_ms = min_interval_ms.max(HARD_MIN_INTERVAL_MS);
        self
    }

    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// Start (or replace) the entry `id`. Returns without waiting for the
    /// first tick. Must be called from within a Tokio runtime.
    pub fn start(
        &self,
        id: impl Into<String>,
        commands: Vec<SequenceCommand>,
        interval_ms: u64,
    ) -> Result<(), ActionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ActionError::InvalidConfig(
                "autopress id must not be empty".to_string(),
            ));
        }
        if commands.is_empty() {
            return Err(ActionError::InvalidConfig(format!(
                "autopress '{}' needs at least one command",
                id
            )));
        }
        if interval_ms < self.min_interval_ms {
            return Err(ActionError::InvalidConfig(format!(
                "autopress interval must be at least {}ms, got {}ms",
                self.min_interval_ms, interval_ms
            )));
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            ActionError::ExecutionFailed(format!("autopress requires a running runtime: {}", e))
        })?;

        let mut entries = self.entries.lock();
        if let Some(previous) = entries.remove(&id) {
            previous.cancel();
            info!("Autopress '{}' replaced", id);
        }

        let count = commands.len();
        let entry = AutopressEntry::spawn(
            &runtime,
            id.clone(),
            commands,
            interval_ms,
            self.sequence.clone(),
            self.targets.clone(),
        );
        entries.insert(id.clone(), entry);
        info!(
            "Autopress '{}' started: {} commands every {}ms",
            id, count, interval_ms
        );
        Ok(())
    }

    /// Cancel and remove `id`. Returns whether it was running.
    pub fn stop(&self, id: &str) -> bool {
        match self.entries.lock().remove(id) {
            Some(entry) => {
                entry.cancel();
                info!("Autopress '{}' stopped", id);
                true
            }
            None => {
                debug!("Autopress '{}' not running", id);
                false
            }
        }
    }

    /// Cancel and remove every entry. Returns how many were running.
    pub fn stop_all(&self) -> usize {
        let entries = std::mem::take(&mut *self.entries.lock());
        for entry in entries.values() {
            entry.cancel();
        }
        if !entries.is_empty() {
            info!("Stopped {} autopress entries", entries.len());
        }
        entries.len()
    }

    /// Running ids, ascending.
    pub fn list_active_ids(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Per-entry status, ordered by id.
    pub fn status(&self) -> Vec<AutopressStatus> {
        self.entries.lock().values().map(AutopressEntry::status).collect()
    }

    /// Stop every entry and wait for in-flight ticks to complete.
    pub async fn shutdown(&self) -> usize {
        let entries = std::mem::take(&mut *self.entries.lock());
        let count = entries.len();
        for entry in entries.into_values() {
            entry.join().await;
        }
        if count > 0 {
            info!("Autopress engine shut down ({} entries stopped)", count);
        }
        count
    }
}

impl Drop for AutopressEngine {
    fn drop(&mut self) {
        for entry in self.entries.get_mut().values() {
            entry.cancel();
        }
    }
}
