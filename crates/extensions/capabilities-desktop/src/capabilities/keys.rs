//! Keyboard capability: chords, text, timed holds.

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use deskhand_protocols::{
    from_params, ActionError, ActionResult, ActionSummary, Capability, CapabilityCategory,
    CapabilityDescriptor, InvocationContext, OperationDescriptor, TargetId,
};

use super::targeting::{resolve, ResolvedTarget};
use super::{
    check_duration, duration_schema, object_schema, run_blocking, run_detached, target_schema,
    DeviceGate, Snapshotter,
};
use crate::backend::{
    parse_chord, BackendError, DesktopBackends, InputBackend, KeyCode, PressAction, WindowBackend,
};

const NAME: &str = "keys";

#[derive(Debug, Deserialize)]
struct PressParams {
    key: String,
    target: Option<TargetId>,
}

#[derive(Debug, Deserialize)]
struct TypeParams {
    text: String,
    target: Option<TargetId>,
}

#[derive(Debug, Deserialize)]
struct HoldParams {
    key: String,
    duration_ms: u64,
    target: Option<TargetId>,
}

/// Press `keys` in order, stopping at the first failure. Returns the keys
/// that went down and the failure, if any.
fn press_all(input: &dyn InputBackend, keys: &[KeyCode]) -> (Vec<KeyCode>, Option<BackendError>) {
    let mut pressed = Vec::with_capacity(keys.len());
    for key in keys {
        if let Err(e) = input.key(*key, PressAction::Press) {
            return (pressed, Some(e));
        }
        pressed.push(*key);
    }
    (pressed, None)
}

/// Release `pressed` in reverse. Every release is attempted; the first
/// failure is reported.
fn release_all(input: &dyn InputBackend, pressed: &[KeyCode]) -> Result<(), BackendError> {
    let mut outcome = Ok(());
    for key in pressed.iter().rev() {
        let released = input.key(*key, PressAction::Release);
        if outcome.is_ok() {
            outcome = released;
        }
    }
    outcome
}

/// Press modifiers in order, tap the final key, release modifiers in
/// reverse. Modifiers already pressed are released even on failure.
pub(crate) fn press_chord(input: &dyn InputBackend, keys: &[KeyCode]) -> Result<(), BackendError> {
    let Some((last, modifiers)) = keys.split_last() else {
        return Ok(());
    };
    let (pressed, failure) = press_all(input, modifiers);
    let outcome = match failure {
        Some(e) => Err(e),
        None => input.key(*last, PressAction::Click),
    };
    let released = release_all(input, &pressed);
    outcome.and(released)
}

/// Hold `keys` down for `duration`. Whatever went down is released, also
/// when a press fails part way.
async fn hold_chord(
    input: Arc<dyn InputBackend>,
    keys: Vec<KeyCode>,
    duration: Duration,
) -> Result<(), ActionError> {
    let down = input.clone();
    let (pressed, failure) = run_blocking(move || Ok(press_all(down.as_ref(), &keys))).await?;
    if failure.is_none() {
        tokio::time::sleep(duration).await;
    }
    let released = run_blocking(move || release_all(input.as_ref(), &pressed)).await;
    match failure {
        Some(e) => Err(e.into()),
        None => released,
    }
}

fn chord(key: &str) -> Result<Vec<KeyCode>, ActionError> {
    if key.trim().is_empty() {
        return Err(ActionError::invalid_parameter("key", "key must not be empty"));
    }
    parse_chord(key).map_err(ActionError::from)
}

/// Keyboard input.
pub struct KeysCapability {
    descriptor: CapabilityDescriptor,
    input: Arc<dyn InputBackend>,
    windows: Arc<dyn WindowBackend>,
    snapshots: Snapshotter,
    gate: Arc<DeviceGate>,
}

impl KeysCapability {
    pub(crate) fn new(backends: &DesktopBackends, snapshots: Snapshotter) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                NAME,
                CapabilityCategory::Input,
                "Press key chords, type text and hold keys",
            ),
            input: backends.input.clone(),
            windows: backends.windows.clone(),
            snapshots,
            gate: Arc::new(DeviceGate::new(())),
        }
    }

    async fn focus(&self, target: Option<&ResolvedTarget>) -> Result<(), ActionError> {
        if let Some(target) = target {
            let windows = self.windows.clone();
            let window = target.window.clone();
            run_blocking(move || windows.focus(&window)).await?;
        }
        Ok(())
    }

    async fn finish(&self, summary: ActionSummary, target: Option<ResolvedTarget>) -> ActionResult {
        let mut result = summary.target(target.as_ref().map(|t| t.id)).into_result();
        self.snapshots
            .attach(&mut result, target.as_ref().map(ResolvedTarget::region))
            .await;
        result
    }

    async fn press(&self, params: PressParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let keys = chord(&params.key)?;
        let target = resolve(&self.windows, params.target, &ctx.targets).await?;
        {
            let _gate = self.gate.lock().await;
            self.focus(target.as_ref()).await?;
            let input = self.input.clone();
            run_blocking(move || press_chord(input.as_ref(), &keys)).await?;
        }
        debug!("Pressed {}", params.key);

        let summary = ActionSummary::new(NAME, "press").field("key", &params.key);
        Ok(self.finish(summary, target).await)
    }

    async fn type_text(&self, params: TypeParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        if params.text.is_empty() {
            return Err(ActionError::invalid_parameter("text", "text must not be empty"));
        }
        let target = resolve(&self.windows, params.target, &ctx.targets).await?;
        {
            let _gate = self.gate.lock().await;
            self.focus(target.as_ref()).await?;
            let input = self.input.clone();
            let text = params.text.clone();
            run_blocking(move || input.type_text(&text)).await?;
        }
        debug!("Typed {} chars", params.text.chars().count());

        let summary = ActionSummary::new(NAME, "type").field("text", &params.text);
        Ok(self.finish(summary, target).await)
    }

    async fn hold(&self, params: HoldParams, ctx: &InvocationContext) -> Result<ActionResult, ActionError> {
        let keys = chord(&params.key)?;
        check_duration("duration_ms", params.duration_ms)?;
        let target = resolve(&self.windows, params.target, &ctx.targets).await?;

        // The hold runs as its own task holding the gate, so dropping this
        // call never leaves keys down.
        let gate = self.gate.clone().lock_owned().await;
        let input = self.input.clone();
        let windows = self.windows.clone();
        let window = target.as_ref().map(|t| t.window.clone());
        let duration = Duration::from_millis(params.duration_ms);
        run_detached(async move {
            let _gate = gate;
            if let Some(window) = window {
                run_blocking(move || windows.focus(&window)).await?;
            }
            hold_chord(input, keys, duration).await
        })
        .await?;
        debug!("Held {} for {}ms", params.key, params.duration_ms);

        let summary = ActionSummary::new(NAME, "hold")
            .field("key", &params.key)
            .field("duration_ms", params.duration_ms);
        Ok(self.finish(summary, target).await)
    }
}

#[async_trait]
impl Capability for KeysCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        let key = json!({
            "type": "string",
            "description": "Key name or '+'-separated chord, e.g. 'enter', 'ctrl+shift+t'"
        });
        vec![
            OperationDescriptor::new("press", "Press a key or key chord").with_parameters_schema(
                object_schema(json!({ "key": key, "target": target_schema() }), &["key"]),
            ),
            OperationDescriptor::new("type", "Type a string of text").with_parameters_schema(
                object_schema(
                    json!({ "text": { "type": "string", "minLength": 1 }, "target": target_schema() }),
                    &["text"],
                ),
            ),
            OperationDescriptor::new("hold", "Hold a key or chord down for a duration")
                .with_parameters_schema(object_schema(
                    json!({
                        "key": key,
                        "duration_ms": duration_schema(None),
                        "target": target_schema(),
                    }),
                    &["key", "duration_ms"],
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
            "press" => self.press(from_params(params)?, ctx).await,
            "type" => self.type_text(from_params(params)?, ctx).await,
            "hold" => self.hold(from_params(params)?, ctx).await,
            other => Err(ActionError::unknown_operation(NAME, other)),
        }
    }
}
