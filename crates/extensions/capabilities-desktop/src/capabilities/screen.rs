//! Screen capture capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use deskhand_protocols::{
    from_params, ActionError, ActionResult, ActionSummary, Capability, CapabilityCategory,
    CapabilityDescriptor, ContentItem, InvocationContext, OperationDescriptor, TargetId,
};

use super::targeting::resolve;
use super::{object_schema, run_blocking, target_schema, Snapshotter};
use crate::backend::{CaptureBackend, DesktopBackends, Region, WindowBackend};
use crate::snapshot::JPEG_MIME;

const NAME: &str = "screen";

#[derive(Debug, Deserialize)]
struct CaptureParams {
    target: Option<TargetId>,
    region: Option<Region>,
}

/// Screenshots and display enumeration.
pub struct ScreenCapability {
    descriptor: CapabilityDescriptor,
    capture: Arc<dyn CaptureBackend>,
    windows: Arc<dyn WindowBackend>,
    snapshots: Snapshotter,
}

impl ScreenCapability {
    pub(crate) fn new(backends: &DesktopBackends, snapshots: Snapshotter) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                NAME,
                CapabilityCategory::Vision,
                "Capture the screen, a window or a region",
            ),
            capture: backends.capture.clone(),
            windows: backends.windows.clone(),
            snapshots,
        }
    }

    async fn capture(&self, params: CaptureParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        if let Some(region) = &params.region {
            if region.width == 0 || region.height == 0 {
                return Err(ActionError::invalid_parameter(
                    "region",
                    "region width and height must be positive",
                ));
            }
        }
        let target = resolve(&self.windows, params.target, &ctx.targets).await?;

        // A region is relative to the target window when there is one.
        let area = match (&target, params.region) {
            (Some(t), Some(r)) => {
                let (x, y) = t.window.to_screen(r.x, r.y).ok_or_else(|| {
                    ActionError::invalid_parameter(
                        "region",
                        format!("region is out of range for target {}", t.id),
                    )
                })?;
                Some(Region { x, y, ..r })
            }
            (Some(t), None) => Some(t.region()),
            (None, region) => region,
        };

        let snap = self.snapshots.take(area).await?;
        debug!("Captured {}x{} (from {}x{})", snap.width, snap.height, snap.source.0, snap.source.1);

        let mut summary = ActionSummary::new(NAME, "capture")
            .field("width", snap.width)
            .field("height", snap.height);
        if snap.was_scaled() {
            summary = summary.field("original_size", [snap.source.0, snap.source.1]);
        }
        if let Some(region) = params.region {
            summary = summary.field("region", region);
        }
        Ok(summary
            .target(target.map(|t| t.id))
            .into_result()
            .with_item(ContentItem::image(&snap.bytes, JPEG_MIME)))
    }

    async fn displays(&self) -> Result<ActionResult, ActionError> {
        let capture = self.capture.clone();
        let displays = run_blocking(move || capture.displays()).await?;
        Ok(ActionSummary::new(NAME, "displays")
            .field("count", displays.len())
            .field("displays", displays)
            .into_result())
    }
}

#[async_trait]
impl Capability for ScreenCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new(
                "capture",
                "Capture the primary display, a target window, or a region as JPEG",
            )
            .with_parameters_schema(object_schema(
                json!({
                    "target": target_schema(),
                    "region": {
                        "type": "object",
                        "properties": {
                            "x": { "type": "integer" },
                            "y": { "type": "integer" },
                            "width": { "type": "integer", "minimum": 1 },
                            "height": { "type": "integer", "minimum": 1 }
                        },
                        "required": ["x", "y", "width", "height"],
                        "description": "Absolute, or relative to the target window"
                    }
                }),
                &[],
            ))
            .read_only(),
            OperationDescriptor::new("displays", "List connected monitors").read_only(),
        ]
    }

    async fn execute(
        &self,
        operation: &str,
        params: serde_json::Value,
        ctx: &InvocationContext,
    ) -> Result<ActionResult, ActionError> {
        match operation {
            "capture" => self.capture(from_params(params)?, ctx).await,
            "displays" => self.displays().await,
            other => Err(ActionError::unknown_operation(NAME, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DryRunBackend, DryRunCall};
    use crate::snapshot::SnapshotPolicy;
    use crate::testing::Fixture;

    fn screen(fx: &Fixture) -> ScreenCapability {
        ScreenCapability::new(&fx.backends, fx.snapshots.clone())
    }

    #[tokio::test]
    async fn test_capture_primary_display() {
        let fx = Fixture::new();
        let result = screen(&fx)
            .execute("capture", json!({}), &fx.ctx())
            .await
            .unwrap();

        assert_eq!(result.images().count(), 1);
        let text = result.texts().next().unwrap();
        assert!(text.contains("width: 1280"));
        assert!(text.contains("target: focused"));
        assert_eq!(fx.backend.calls(), vec![DryRunCall::Capture(None)]);
    }

    #[tokio::test]
    async fn test_capture_scales_to_budget() {
        let fx = Fixture::with_backend(
            DryRunBackend::new().with_display(2000, 1000),
            SnapshotPolicy {
                max_pixels: 500_000,
                ..SnapshotPolicy::default()
            },
        );
        let result = screen(&fx)
            .execute("capture", json!({}), &fx.ctx())
            .await
            .unwrap();
        let text = result.texts().next().unwrap();
        assert!(text.contains("width: 1000"));
        assert!(text.contains("original_size: [2000,1000]"));
    }

    #[tokio::test]
    async fn test_capture_region_relative_to_target() {
        let fx = Fixture::new();
        screen(&fx)
            .execute(
                "capture",
                json!({"target": 0, "region": {"x": 10, "y": 10, "width": 50, "height": 40}}),
                &fx.ctx(),
            )
            .await
            .unwrap();
        assert_eq!(
            fx.backend.calls(),
            vec![DryRunCall::Capture(Some(Region {
                x: 110,
                y: 60,
                width: 50,
                height: 40
            }))]
        );
    }

    #[tokio::test]
    async fn test_capture_ignores_after_action_switch() {
        let fx = Fixture::with_backend(DryRunBackend::new(), SnapshotPolicy::disabled());
        let result = screen(&fx)
            .execute("capture", json!({}), &fx.ctx())
            .await
            .unwrap();
        assert!(result.has_image());
    }

    #[tokio::test]
    async fn test_capture_failure_is_an_error() {
        let fx = Fixture::new();
        fx.backend.fail_captures(true);
        let err = screen(&fx)
            .execute("capture", json!({}), &fx.ctx())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "execution_failed");
    }

    #[tokio::test]
    async fn test_empty_region_rejected() {
        let fx = Fixture::new();
        let err = screen(&fx)
            .execute(
                "capture",
                json!({"region": {"x": 0, "y": 0, "width": 0, "height": 10}}),
                &fx.ctx(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[tokio::test]
    async fn test_region_overflowing_target_is_rejected() {
        let fx = Fixture::new();
        let err = screen(&fx)
            .execute(
                "capture",
                json!({"target": 1, "region": {"x": i32::MAX, "y": 0, "width": 10, "height": 10}}),
                &fx.ctx(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
        assert!(err.to_string().contains("region"));
    }

    #[tokio::test]
    async fn test_displays() {
        let fx = Fixture::new();
        let result = screen(&fx)
            .execute("displays", json!({}), &fx.ctx())
            .await
            .unwrap();
        let text = result.texts().next().unwrap();
        assert!(text.contains("count: 1"));
        assert!(text.contains("\"is_primary\":true"));
    }

    #[test]
    fn test_all_operations_read_only() {
        let fx = Fixture::new();
        assert!(screen(&fx).operations().iter().all(|op| op.is_read_only()));
    }
}
