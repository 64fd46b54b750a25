//! Pointer capability: move, click, drag, scroll.

#[cfg(test)]
#[path = "pointer_tests.rs"]
mod tests;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use deskhand_protocols::{
    from_params, ActionError, ActionResult, ActionSummary, Capability, CapabilityCategory,
    CapabilityDescriptor, InvocationContext, OperationDescriptor, TargetId,
};

use super::targeting::{resolve, to_screen, ResolvedTarget};
use super::{object_schema, point_schema, run_blocking, target_schema, DeviceGate, Snapshotter};
use crate::backend::{
    DesktopBackends, InputBackend, MouseButton, PressAction, ScrollDirection, WindowBackend,
};

const NAME: &str = "pointer";

#[derive(Debug, Deserialize)]
struct MoveParams {
    coordinate: [i32; 2],
    target: Option<TargetId>,
}

#[derive(Debug, Deserialize)]
struct ClickParams {
    coordinate: Option<[i32; 2]>,
    #[serde(default)]
    button: MouseButton,
    #[serde(default = "default_count")]
    count: u32,
    target: Option<TargetId>,
}

#[derive(Debug, Deserialize)]
struct DragParams {
    start: [i32; 2],
    end: [i32; 2],
    #[serde(default)]
    button: MouseButton,
    target: Option<TargetId>,
}

#[derive(Debug, Deserialize)]
struct ScrollParams {
    coordinate: Option<[i32; 2]>,
    direction: ScrollDirection,
    #[serde(default = "default_amount")]
    amount: i32,
    target: Option<TargetId>,
}

fn default_count() -> u32 {
    1
}

fn default_amount() -> i32 {
    3
}

/// Mouse pointer control.
///
/// Coordinates are window-relative when a target resolves, absolute
/// otherwise. The target window is focused before input is injected.
pub struct PointerCapability {
    descriptor: CapabilityDescriptor,
    input: Arc<dyn InputBackend>,
    windows: Arc<dyn WindowBackend>,
    snapshots: Snapshotter,
    gate: DeviceGate,
    last_position: Mutex<Option<(i32, i32)>>,
}

impl PointerCapability {
    pub(crate) fn new(backends: &DesktopBackends, snapshots: Snapshotter) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                NAME,
                CapabilityCategory::Input,
                "Move, click, drag and scroll the mouse pointer",
            ),
            input: backends.input.clone(),
            windows: backends.windows.clone(),
            snapshots,
            gate: DeviceGate::new(()),
            last_position: Mutex::new(None),
        }
    }

    /// Focus the target (if any), then run `f` against the input backend.
    async fn inject<F>(&self, target: Option<&ResolvedTarget>, f: F) -> Result<(), ActionError>
    where
        F: FnOnce(&dyn InputBackend) -> Result<(), crate::backend::BackendError> + Send + 'static,
    {
        let input = self.input.clone();
        let windows = self.windows.clone();
        let window = target.map(|t| t.window.clone());
        let _gate = self.gate.lock().await;
        run_blocking(move || {
            if let Some(window) = &window {
                windows.focus(window)?;
            }
            f(input.as_ref())
        })
        .await
    }

    async fn finish(
        &self,
        summary: ActionSummary,
        target: Option<&ResolvedTarget>,
        position: (i32, i32),
    ) -> ActionResult {
        *self.last_position.lock() = Some(position);
        let mut result = summary.target(target.map(|t| t.id)).into_result();
        self.snapshots
            .attach(&mut result, target.map(ResolvedTarget::region))
            .await;
        result
    }

    async fn move_to(&self, params: MoveParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let target = resolve(&self.windows, params.target, &ctx.targets).await?;
        let (x, y) = to_screen(target.as_ref(), "coordinate", params.coordinate)?;
        self.inject(target.as_ref(), move |input| input.move_pointer(x, y))
            .await?;
        debug!("Pointer moved to ({}, {})", x, y);

        let summary = ActionSummary::new(NAME, "move").field("coordinate", params.coordinate);
        Ok(self.finish(summary, target.as_ref(), (x, y)).await)
    }

    async fn click(&self, params: ClickParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        if !(1..=3).contains(&params.count) {
            return Err(ActionError::invalid_parameter("count", "count must be 1-3"));
        }
        let target = resolve(&self.windows, params.target, &ctx.targets).await?;
        let point = params
            .coordinate
            .map(|c| to_screen(target.as_ref(), "coordinate", c))
            .transpose()?;
        let (button, count) = (params.button, params.count);
        self.inject(target.as_ref(), move |input| {
            if let Some((x, y)) = point {
                input.move_pointer(x, y)?;
            }
            for _ in 0..count {
                input.button(button, PressAction::Click)?;
            }
            Ok(())
        })
        .await?;
        debug!("Pointer clicked {:?} x{}", button, count);

        let position = point.or(*self.last_position.lock()).unwrap_or_default();
        let mut summary = ActionSummary::new(NAME, "click");
        if let Some(coordinate) = params.coordinate {
            summary = summary.field("coordinate", coordinate);
        }
        let summary = summary.field("button", button).field("count", count);
        Ok(self.finish(summary, target.as_ref(), position).await)
    }

    async fn drag(&self, params: DragParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let target = resolve(&self.windows, params.target, &ctx.targets).await?;
        let (sx, sy) = to_screen(target.as_ref(), "start", params.start)?;
        let (ex, ey) = to_screen(target.as_ref(), "end", params.end)?;
        let button = params.button;
        self.inject(target.as_ref(), move |input| {
            input.move_pointer(sx, sy)?;
            input.button(button, PressAction::Press)?;
            let moved = input.move_pointer(ex, ey);
            // Never leave the button down.
            input.button(button, PressAction::Release)?;
            moved
        })
        .await?;
        debug!("Pointer dragged ({}, {}) -> ({}, {})", sx, sy, ex, ey);

        let summary = ActionSummary::new(NAME, "drag")
            .field("start", params.start)
            .field("end", params.end)
            .field("button", button);
        Ok(self.finish(summary, target.as_ref(), (ex, ey)).await)
    }

    async fn scroll(&self, params: ScrollParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        if params.amount < 1 {
            return Err(ActionError::invalid_parameter("amount", "amount must be at least 1"));
        }
        let target = resolve(&self.windows, params.target, &ctx.targets).await?;
        let point = params
            .coordinate
            .map(|c| to_screen(target.as_ref(), "coordinate", c))
            .transpose()?;
        let (direction, amount) = (params.direction, params.amount);
        self.inject(target.as_ref(), move |input| {
            if let Some((x, y)) = point {
                input.move_pointer(x, y)?;
            }
            input.scroll(direction, amount)
        })
        .await?;

        let position = point.or(*self.last_position.lock()).unwrap_or_default();
        let mut summary = ActionSummary::new(NAME, "scroll");
        if let Some(coordinate) = params.coordinate {
            summary = summary.field("coordinate", coordinate);
        }
        let summary = summary.field("direction", direction).field("amount", amount);
        Ok(self.finish(summary, target.as_ref(), position).await)
    }

    fn position(&self) -> ActionResult {
        let position = self.last_position.lock().map(|(x, y)| [x, y]);
        ActionSummary::new(NAME, "position")
            .field("position", position)
            .into_result()
    }
}

#[async_trait]
impl Capability for PointerCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        let button = json!({ "type": "string", "enum": ["left", "right", "middle"], "default": "left" });
        vec![
            OperationDescriptor::new("move", "Move the pointer to a coordinate").with_parameters_schema(
                object_schema(
                    json!({
                        "coordinate": point_schema("[x, y] to move to"),
                        "target": target_schema(),
                    }),
                    &["coordinate"],
                ),
            ),
            OperationDescriptor::new("click", "Click a mouse button, optionally at a coordinate")
                .with_parameters_schema(object_schema(
                    json!({
                        "coordinate": point_schema("[x, y] to click at; current position if omitted"),
                        "button": button,
                        "count": { "type": "integer", "minimum": 1, "maximum": 3, "default": 1 },
                        "target": target_schema(),
                    }),
                    &[],
                )),
            OperationDescriptor::new("drag", "Press at start, move to end, release")
                .with_parameters_schema(object_schema(
                    json!({
                        "start": point_schema("[x, y] where the drag begins"),
                        "end": point_schema("[x, y] where the drag ends"),
                        "button": button,
                        "target": target_schema(),
                    }),
                    &["start", "end"],
                )),
            OperationDescriptor::new("scroll", "Scroll the mouse wheel").with_parameters_schema(
                object_schema(
                    json!({
                        "coordinate": point_schema("[x, y] to scroll at"),
                        "direction": { "type": "string", "enum": ["up", "down", "left", "right"] },
                        "amount": { "type": "integer", "minimum": 1, "default": 3 },
                        "target": target_schema(),
                    }),
                    &["direction"],
                ),
            ),
            OperationDescriptor::new("position", "Last pointer position set through this capability")
                .read_only(),
        ]
    }

    async fn execute(
        &self,
        operation: &str,
        params: serde_json::Value,
        ctx: &InvocationContext,
    ) -> Result<ActionResult, ActionError> {
        match operation {
            "move" => self.move_to(from_params(params)?, ctx).await,
            "click" => self.click(from_params(params)?, ctx).await,
            "drag" => self.drag(from_params(params)?, ctx).await,
            "scroll" => self.scroll(from_params(params)?, ctx).await,
            "position" => Ok(self.position()),
            other => Err(ActionError::unknown_operation(NAME, other)),
        }
    }
}
