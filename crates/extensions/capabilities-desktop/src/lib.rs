//! Desktop capabilities for deskhand.
//!
//! ## Capabilities
//! - `pointer` - move, click, drag, scroll, position
//! - `keys` - press (chords), type, hold
//! - `controller` - virtual gamepad: button, trigger, stick, reset, state
//! - `screen` - capture, displays
//! - `window` - list, select, current, focus, move_resize
//!
//! All device access goes through the traits in [`backend`]. Use
//! [`DesktopBackends::native`] for the real machine or
//! [`DesktopBackends::dry_run`] to record calls without touching anything.

pub mod backend;
mod capabilities;
mod environment;
mod snapshot;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use deskhand_protocols::Capability;

pub use backend::{DesktopBackends, DryRunBackend, DryRunCall};
pub use capabilities::{
    ControllerCapability, KeysCapability, PointerCapability, ResolvedTarget, ScreenCapability,
    WindowCapability,
};
pub use environment::{BackendCheck, EnvironmentReport};
pub use snapshot::{fit_within, EncodedSnapshot, SnapshotPolicy};

use capabilities::Snapshotter;

/// Builds the five desktop capabilities over one set of backends.
pub struct DesktopCapabilities {
    backends: DesktopBackends,
    policy: SnapshotPolicy,
}

impl DesktopCapabilities {
    pub fn new(backends: DesktopBackends, policy: SnapshotPolicy) -> Self {
        Self { backends, policy }
    }

    pub fn backends(&self) -> &DesktopBackends {
        &self.backends
    }

    /// One instance of each capability, ready for registration.
    pub fn into_capabilities(self) -> Vec<Arc<dyn Capability>> {
        let snapshots = Snapshotter::new(self.backends.capture.clone(), self.policy);
        vec![
            Arc::new(PointerCapability::new(&self.backends, snapshots.clone())),
            Arc::new(KeysCapability::new(&self.backends, snapshots.clone())),
            Arc::new(ControllerCapability::new(&self.backends, snapshots.clone())),
            Arc::new(ScreenCapability::new(&self.backends, snapshots)),
            Arc::new(WindowCapability::new(&self.backends)),
        ]
    }

    /// Probe every backend once.
    pub async fn check_environment(&self) -> EnvironmentReport {
        environment::check(&self.backends).await
    }
}
