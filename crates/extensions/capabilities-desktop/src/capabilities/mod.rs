//! The five desktop capabilities.

mod controller;
mod keys;
mod pointer;
mod screen;
mod targeting;
mod window;

pub use controller::ControllerCapability;
pub use keys::KeysCapability;
pub use pointer::PointerCapability;
pub use screen::ScreenCapability;
pub use targeting::ResolvedTarget;
pub use window::WindowCapability;

use std::future::Future;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use deskhand_protocols::{ActionError, ActionResult, ContentItem};

use crate::backend::{BackendError, CaptureBackend, Region};
use crate::snapshot::{encode_frame, EncodedSnapshot, SnapshotPolicy, JPEG_MIME};

/// Serializes mutating backend interactions on one device.
pub(crate) type DeviceGate = tokio::sync::Mutex<()>;

/// Longest hold accepted by any timed operation.
pub(crate) const MAX_DURATION_MS: u64 = 10_000;

// Run a blocking backend call on the blocking pool.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ActionError>
where
    F: FnOnce() -> Result<T, BackendError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ActionError::ExecutionFailed(e.to_string()))?
        .map_err(ActionError::from)
}

/// Run `fut` as its own task and wait for it. Dropping the caller does not
/// cancel the task, so a timed hold always reaches its release step.
pub(crate) async fn run_detached<F, T>(fut: F) -> Result<T, ActionError>
where
    F: Future<Output = Result<T, ActionError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| ActionError::ExecutionFailed(e.to_string()))?
}

pub(crate) fn check_duration(field: &str, duration_ms: u64) -> Result<(), ActionError> {
    if (1..=MAX_DURATION_MS).contains(&duration_ms) {
        Ok(())
    } else {
        Err(ActionError::invalid_parameter(
            field,
            format!("{} must be 1-{}", field, MAX_DURATION_MS),
        ))
    }
}

/// Captures and encodes snapshots per the configured policy.
#[derive(Clone)]
pub(crate) struct Snapshotter {
    capture: Arc<dyn CaptureBackend>,
    policy: SnapshotPolicy,
}

impl Snapshotter {
    pub(crate) fn new(capture: Arc<dyn CaptureBackend>, policy: SnapshotPolicy) -> Self {
        Self { capture, policy }
    }

    /// Capture `region` (primary display when `None`) and encode it.
    pub(crate) async fn take(&self, region: Option<Region>) -> Result<EncodedSnapshot, ActionError> {
        let capture = self.capture.clone();
        let policy = self.policy;
        run_blocking(move || encode_frame(capture.capture(region)?, &policy)).await
    }

    /// Append a post-action snapshot, or a note saying why there is none.
    pub(crate) async fn attach(&self, result: &mut ActionResult, region: Option<Region>) {
        if !self.policy.after_action {
            return;
        }
        match self.take(region).await {
            Ok(snap) => result.push(ContentItem::image(&snap.bytes, JPEG_MIME)),
            Err(e) => {
                debug!("Snapshot skipped: {}", e);
                result.push(ContentItem::text(format!("snapshot unavailable: {}", e)));
            }
        }
    }
}

// JSON schema helpers.

pub(crate) fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

pub(crate) fn target_schema() -> Value {
    json!({
        "type": "integer",
        "minimum": 0,
        "description": "Window id from window.list; defaults to the selected window, else the focused one"
    })
}

pub(crate) fn point_schema(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "integer" },
        "minItems": 2,
        "maxItems": 2,
        "description": description
    })
}

pub(crate) fn duration_schema(default: Option<u64>) -> Value {
    let mut schema = json!({
        "type": "integer",
        "minimum": 1,
        "maximum": MAX_DURATION_MS,
    });
    if let Some(default) = default {
        schema["default"] = json!(default);
    }
    schema
}
