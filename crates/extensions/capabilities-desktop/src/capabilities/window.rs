//! Window management capability and the selection half of targeting.

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use deskhand_protocols::{
    from_params, ActionError, ActionResult, ActionSummary, Capability, CapabilityCategory,
    CapabilityDescriptor, InvocationContext, OperationDescriptor, TargetId,
};

use super::targeting::{pick, resolve, ResolvedTarget};
use super::{object_schema, run_blocking, target_schema, DeviceGate};
use crate::backend::{DesktopBackends, Geometry, WindowBackend, WindowInfo};

const NAME: &str = "window";

#[derive(Debug, Deserialize)]
struct FocusParams {
    target: Option<TargetId>,
}

#[derive(Debug, Deserialize)]
struct MoveResizeParams {
    target: Option<TargetId>,
    #[serde(flatten)]
    geometry: Geometry,
}

/// One row of `window.list`.
#[derive(Debug, Serialize)]
struct WindowEntry<'a> {
    id: usize,
    title: &'a str,
    app_name: &'a str,
    pid: u32,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    focused: bool,
    selected: bool,
}

/// Window enumeration, selection, focus and placement.
pub struct WindowCapability {
    descriptor: CapabilityDescriptor,
    windows: Arc<dyn WindowBackend>,
    gate: DeviceGate,
}

impl WindowCapability {
    pub(crate) fn new(backends: &DesktopBackends) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                NAME,
                CapabilityCategory::System,
                "List, select, focus, move and resize top-level windows",
            ),
            windows: backends.windows.clone(),
            gate: DeviceGate::new(()),
        }
    }

    async fn enumerate(&self) -> Result<Vec<WindowInfo>, ActionError> {
        let windows = self.windows.clone();
        run_blocking(move || windows.list()).await
    }

    /// Like [`resolve`], but an operation on "whatever has focus" makes no
    /// sense for window placement.
    async fn require_target(
        &self,
        explicit: Option<TargetId>,
        ctx: &InvocationContext,
    ) -> Result<ResolvedTarget, ActionError> {
        resolve(&self.windows, explicit, &ctx.targets)
            .await?
            .ok_or_else(|| {
                ActionError::invalid_parameter(
                    "target",
                    "target is required when no window is selected",
                )
            })
    }

    async fn list(&self, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let windows = self.enumerate().await?;
        let selected = ctx.targets.current();
        let entries: Vec<WindowEntry<'_>> = windows
            .iter()
            .enumerate()
            .map(|(id, w)| WindowEntry {
                id,
                title: &w.title,
                app_name: &w.app_name,
                pid: w.pid,
                x: w.x,
                y: w.y,
                width: w.width,
                height: w.height,
                focused: w.is_focused,
                selected: selected == Some(id as TargetId),
            })
            .collect();

        Ok(ActionSummary::new(NAME, "list")
            .field("count", entries.len())
            .field("selected", selected)
            .field("windows", &entries)
            .into_result())
    }

    async fn select(&self, params: Value, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let target = match params.get("target") {
            None => {
                return Err(ActionError::invalid_parameter(
                    "target",
                    "target is required (null clears the selection)",
                ));
            }
            Some(Value::Null) => None,
            Some(value) => Some(value.as_i64().ok_or_else(|| {
                ActionError::invalid_parameter("target", "target must be an integer or null")
            })?),
        };

        let mut summary = ActionSummary::new(NAME, "select");
        match target {
            Some(id) => {
                let resolved = pick(self.enumerate().await?, id)?;
                ctx.targets.select(Some(id));
                info!("Selected window {} ({})", id, resolved.window.title);
                summary = summary.field("title", &resolved.window.title);
            }
            None => {
                ctx.targets.select(None);
                info!("Cleared window selection");
            }
        }
        Ok(summary.field("selected", target).target(target).into_result())
    }

    async fn current(&self, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let selected = ctx.targets.current();
        let mut summary = ActionSummary::new(NAME, "current").field("selected", selected);
        if let Some(id) = selected {
            // The selection may have gone stale since it was made.
            match pick(self.enumerate().await?, id) {
                Ok(resolved) => summary = summary.field("title", &resolved.window.title),
                Err(e) => summary = summary.field("stale", e.to_string()),
            }
        }
        Ok(summary.target(selected).into_result())
    }

    async fn focus(&self, params: FocusParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let target = self.require_target(params.target, ctx).await?;
        {
            let _gate = self.gate.lock().await;
            let windows = self.windows.clone();
            let window = target.window.clone();
            run_blocking(move || windows.focus(&window)).await?;
        }
        debug!("Focused window {}", target.id);

        Ok(ActionSummary::new(NAME, "focus")
            .field("title", &target.window.title)
            .target(Some(target.id))
            .into_result())
    }

    async fn move_resize(&self, params: MoveResizeParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let geometry = params.geometry;
        if geometry.is_empty() {
            return Err(ActionError::invalid_parameter(
                "geometry",
                "at least one of x, y, width, height is required",
            ));
        }
        if geometry.width == Some(0) || geometry.height == Some(0) {
            return Err(ActionError::invalid_parameter(
                "geometry",
                "width and height must be positive",
            ));
        }
        let target = self.require_target(params.target, ctx).await?;
        {
            let _gate = self.gate.lock().await;
            let windows = self.windows.clone();
            let window = target.window.clone();
            run_blocking(move || windows.move_resize(&window, geometry)).await?;
        }
        debug!("Moved/resized window {} to {:?}", target.id, geometry);

        let mut summary = ActionSummary::new(NAME, "move_resize");
        if let Some(x) = geometry.x {
            summary = summary.field("x", x);
        }
        if let Some(y) = geometry.y {
            summary = summary.field("y", y);
        }
        if let Some(width) = geometry.width {
            summary = summary.field("width", width);
        }
        if let Some(height) = geometry.height {
            summary = summary.field("height", height);
        }
        Ok(summary.target(Some(target.id)).into_result())
    }
}

#[async_trait]
impl Capability for WindowCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new("list", "List windows; ids are valid target values").read_only(),
            OperationDescriptor::new("select", "Select the default target window, or clear it with null")
                .with_parameters_schema(object_schema(
                    json!({ "target": { "type": ["integer", "null"], "minimum": 0 } }),
                    &["target"],
                )),
            OperationDescriptor::new("current", "The selected target window").read_only(),
            OperationDescriptor::new("focus", "Bring a window to the front").with_parameters_schema(
                object_schema(json!({ "target": target_schema() }), &[]),
            ),
            OperationDescriptor::new("move_resize", "Move and/or resize a window")
                .with_parameters_schema(object_schema(
                    json!({
                        "target": target_schema(),
                        "x": { "type": "integer" },
                        "y": { "type": "integer" },
                        "width": { "type": "integer", "minimum": 1 },
                        "height": { "type": "integer", "minimum": 1 },
                    }),
                    &[],
                )),
        ]
    }

    async fn execute(
        &self,
        operation: &str,
        params: serde_json::Value,
        ctx: &InvocationContext,
    ) -> Result<ActionResult, ActionError> {
        match operation {
            "list" => self.list(ctx).await,
            "select" => self.select(params, ctx).await,
            "current" => self.current(ctx).await,
            "focus" => self.focus(from_params(params)?, ctx).await,
            "move_resize" => self.move_resize(from_params(params)?, ctx).await,
            other => Err(ActionError::unknown_operation(NAME, other)),
        }
    }
}
