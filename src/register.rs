//! Backend selection and capability registration.

use std::sync::Arc;

use tracing::info;

use deskhand_capabilities_desktop::{
    DesktopBackends, DesktopCapabilities, DryRunBackend, SnapshotPolicy,
};
use deskhand_config::{BackendKind, Config};
use deskhand_core::{CapabilityRegistry, Router, RouterLimits};

pub(crate) fn snapshot_policy(config: &Config) -> SnapshotPolicy {
    SnapshotPolicy {
        after_action: config.snapshot.after_action,
        max_pixels: config.snapshot.max_pixels,
        jpeg_quality: config.snapshot.jpeg_quality,
    }
}

/// Desktop capabilities over the configured backend.
pub(crate) fn desktop(config: &Config) -> DesktopCapabilities {
    let backends = match config.backend.kind {
        BackendKind::Native => DesktopBackends::native(),
        BackendKind::DryRun => {
            info!("Using dry-run backend; no device will be touched");
            DesktopBackends::dry_run(Arc::new(DryRunBackend::new()))
        }
    };
    DesktopCapabilities::new(backends, snapshot_policy(config))
}

/// Register every desktop capability and wrap the registry in a router.
pub(crate) fn build_router(config: &Config, desktop: DesktopCapabilities) -> Arc<Router> {
    let registry = Arc::new(CapabilityRegistry::new());
    for capability in desktop.into_capabilities() {
        registry.register_capability(capability);
    }

    let limits = RouterLimits {
        max_sequence_delay_ms: config.sequence.max_delay_ms,
        min_autopress_interval_ms: config.autopress.min_interval_ms,
    };
    Arc::new(Router::new(registry).with_limits(limits))
}
