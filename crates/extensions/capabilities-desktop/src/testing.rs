//! Shared fixtures for capability tests.

use std::sync::Arc;

use deskhand_protocols::{InvocationContext, TargetContext};

use crate::backend::{DesktopBackends, DryRunBackend};
use crate::capabilities::Snapshotter;
use crate::snapshot::SnapshotPolicy;

pub(crate) struct Fixture {
    pub backend: Arc<DryRunBackend>,
    pub backends: DesktopBackends,
    pub snapshots: Snapshotter,
    pub targets: TargetContext,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_backend(DryRunBackend::new(), SnapshotPolicy::default())
    }

    pub fn with_backend(backend: DryRunBackend, policy: SnapshotPolicy) -> Self {
        let backend = Arc::new(backend);
        let backends = DesktopBackends::dry_run(backend.clone());
        let snapshots = Snapshotter::new(backends.capture.clone(), policy);
        Self {
            backend,
            backends,
            snapshots,
            targets: TargetContext::new(),
        }
    }

    pub fn ctx(&self) -> InvocationContext {
        InvocationContext::new(self.targets.clone())
    }
}
