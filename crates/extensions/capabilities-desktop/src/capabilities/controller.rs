//! Virtual gamepad capability.
//!
//! Owns the pad state machine: neutral, then buttons/triggers/sticks set
//! either for a duration or until changed, then back to neutral on
//! release or an explicit `reset`. Every change pushes the full report to
//! the backend; local state only advances once the backend accepted it.

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};

use deskhand_protocols::{
    from_params, ActionError, ActionResult, ActionSummary, Capability, CapabilityCategory,
    CapabilityDescriptor, InvocationContext, OperationDescriptor,
};

use super::{
    check_duration, duration_schema, object_schema, run_blocking, run_detached, DeviceGate,
    Snapshotter,
};
use crate::backend::{ControllerBackend, ControllerState, DesktopBackends, GamepadButton, Side};

const NAME: &str = "controller";
const DEFAULT_TAP_MS: u64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ButtonAction {
    /// Press, wait `duration_ms`, release.
    #[default]
    Press,
    /// Press and keep held.
    Hold,
    Release,
}

#[derive(Debug, Deserialize)]
struct ButtonParams {
    button: GamepadButton,
    #[serde(default)]
    action: ButtonAction,
    #[serde(default = "default_tap")]
    duration_ms: u64,
}

#[derive(Debug, Deserialize)]
struct TriggerParams {
    side: Side,
    pressure: i64,
    duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StickParams {
    side: Side,
    x: f64,
    y: f64,
    duration_ms: Option<u64>,
}

fn default_tap() -> u64 {
    DEFAULT_TAP_MS
}

fn check_axis(field: &str, value: f64) -> Result<f32, ActionError> {
    if (-1.0..=1.0).contains(&value) {
        Ok(value as f32)
    } else {
        Err(ActionError::invalid_parameter(
            field,
            format!("{} must be between -1.0 and 1.0", field),
        ))
    }
}

fn check_pressure(pressure: i64) -> Result<u8, ActionError> {
    u8::try_from(pressure)
        .map_err(|_| ActionError::invalid_parameter("pressure", "pressure must be 0-255"))
}

/// Backend plus the last report it accepted.
#[derive(Clone)]
struct Pad {
    backend: Arc<dyn ControllerBackend>,
    state: Arc<Mutex<ControllerState>>,
}

impl Pad {
    fn snapshot(&self) -> ControllerState {
        self.state.lock().clone()
    }

    /// Apply `change` to a copy of the state, push it, then commit.
    async fn update(
        &self,
        change: impl FnOnce(&mut ControllerState),
    ) -> Result<ControllerState, ActionError> {
        let mut next = self.snapshot();
        change(&mut next);
        let backend = self.backend.clone();
        let report = next.clone();
        run_blocking(move || backend.apply(&report)).await?;
        *self.state.lock() = next.clone();
        Ok(next)
    }

    /// Apply `set`, wait `duration`, apply `restore`. Runs as its own task
    /// holding `gate`, so dropping the caller cannot skip the restore.
    async fn timed<S, R>(
        &self,
        gate: OwnedMutexGuard<()>,
        set: S,
        duration: Duration,
        restore: R,
    ) -> Result<(), ActionError>
    where
        S: FnOnce(&mut ControllerState) + Send + 'static,
        R: FnOnce(&mut ControllerState) + Send + 'static,
    {
        let pad = self.clone();
        run_detached(async move {
            let _gate = gate;
            pad.update(set).await?;
            tokio::time::sleep(duration).await;
            pad.update(restore).await.map(|_| ())
        })
        .await
    }
}

/// Virtual gamepad.
pub struct ControllerCapability {
    descriptor: CapabilityDescriptor,
    pad: Pad,
    snapshots: Snapshotter,
    gate: Arc<DeviceGate>,
}

impl ControllerCapability {
    pub(crate) fn new(backends: &DesktopBackends, snapshots: Snapshotter) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                NAME,
                CapabilityCategory::Input,
                "Drive a virtual gamepad: buttons, triggers and sticks",
            ),
            pad: Pad {
                backend: backends.controller.clone(),
                state: Arc::new(Mutex::new(ControllerState::default())),
            },
            snapshots,
            gate: Arc::new(DeviceGate::new(())),
        }
    }

    /// Current pad state.
    pub fn state(&self) -> ControllerState {
        self.pad.snapshot()
    }

    async fn probe(&self) -> Result<(), ActionError> {
        let backend = self.pad.backend.clone();
        run_blocking(move || backend.probe()).await
    }

    async fn finish(&self, summary: ActionSummary) -> ActionResult {
        let mut result = summary.field("state", self.state()).into_result();
        self.snapshots.attach(&mut result, None).await;
        result
    }

    async fn button(&self, params: ButtonParams) -> Result<ActionResult, ActionError> {
        if params.action == ButtonAction::Press {
            check_duration("duration_ms", params.duration_ms)?;
        }
        let button = params.button;
        {
            let gate = self.gate.clone().lock_owned().await;
            self.probe().await?;
            match params.action {
                ButtonAction::Press => {
                    self.pad
                        .timed(
                            gate,
                            move |s| {
                                s.buttons.insert(button);
                            },
                            Duration::from_millis(params.duration_ms),
                            move |s| {
                                s.buttons.remove(&button);
                            },
                        )
                        .await?;
                }
                ButtonAction::Hold => {
                    self.pad
                        .update(|s| {
                            s.buttons.insert(button);
                        })
                        .await?;
                }
                ButtonAction::Release => {
                    self.pad
                        .update(|s| {
                            s.buttons.remove(&button);
                        })
                        .await?;
                }
            }
        }
        debug!("Controller button {:?} {:?}", button, params.action);

        let mut summary = ActionSummary::new(NAME, "button")
            .field("button", button)
            .field("action", params.action);
        if params.action == ButtonAction::Press {
            summary = summary.field("duration_ms", params.duration_ms);
        }
        Ok(self.finish(summary).await)
    }

    async fn trigger(&self, params: TriggerParams) -> Result<ActionResult, ActionError> {
        let pressure = check_pressure(params.pressure)?;
        if let Some(ms) = params.duration_ms {
            check_duration("duration_ms", ms)?;
        }
        let side = params.side;
        {
            let gate = self.gate.clone().lock_owned().await;
            self.probe().await?;
            match params.duration_ms {
                Some(ms) => {
                    self.pad
                        .timed(
                            gate,
                            move |s| s.set_trigger(side, pressure),
                            Duration::from_millis(ms),
                            move |s| s.set_trigger(side, 0),
                        )
                        .await?;
                }
                None => {
                    self.pad.update(|s| s.set_trigger(side, pressure)).await?;
                }
            }
        }

        let mut summary = ActionSummary::new(NAME, "trigger")
            .field("side", side)
            .field("pressure", pressure);
        if let Some(ms) = params.duration_ms {
            summary = summary.field("duration_ms", ms);
        }
        Ok(self.finish(summary).await)
    }

    async fn stick(&self, params: StickParams) -> Result<ActionResult, ActionError> {
        let x = check_axis("x", params.x)?;
        let y = check_axis("y", params.y)?;
        if let Some(ms) = params.duration_ms {
            check_duration("duration_ms", ms)?;
        }
        let side = params.side;
        {
            let gate = self.gate.clone().lock_owned().await;
            self.probe().await?;
            match params.duration_ms {
                Some(ms) => {
                    self.pad
                        .timed(
                            gate,
                            move |s| s.set_stick(side, x, y),
                            Duration::from_millis(ms),
                            move |s| s.set_stick(side, 0.0, 0.0),
                        )
                        .await?;
                }
                None => {
                    self.pad.update(|s| s.set_stick(side, x, y)).await?;
                }
            }
        }

        let mut summary = ActionSummary::new(NAME, "stick")
            .field("side", side)
            .field("x", x)
            .field("y", y);
        if let Some(ms) = params.duration_ms {
            summary = summary.field("duration_ms", ms);
        }
        Ok(self.finish(summary).await)
    }

    async fn reset(&self) -> Result<ActionResult, ActionError> {
        {
            let _gate = self.gate.lock().await;
            self.probe().await?;
            self.pad.update(|s| *s = ControllerState::default()).await?;
        }
        info!("Controller reset to neutral");
        Ok(self.finish(ActionSummary::new(NAME, "reset")).await)
    }
}

#[async_trait]
impl Capability for ControllerCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        let side = json!({ "type": "string", "enum": ["left", "right"] });
        let axis = json!({ "type": "number", "minimum": -1.0, "maximum": 1.0 });
        vec![
            OperationDescriptor::new("button", "Press, hold or release a gamepad button")
                .with_parameters_schema(object_schema(
                    json!({
                        "button": {
                            "type": "string",
                            "enum": [
                                "a", "b", "x", "y", "lb", "rb", "ls", "rs", "start", "back",
                                "guide", "dpad_up", "dpad_down", "dpad_left", "dpad_right"
                            ]
                        },
                        "action": { "type": "string", "enum": ["press", "hold", "release"], "default": "press" },
                        "duration_ms": duration_schema(Some(DEFAULT_TAP_MS)),
                    }),
                    &["button"],
                )),
            OperationDescriptor::new("trigger", "Set trigger pressure, optionally for a duration")
                .with_parameters_schema(object_schema(
                    json!({
                        "side": side,
                        "pressure": { "type": "integer", "minimum": 0, "maximum": 255 },
                        "duration_ms": duration_schema(None),
                    }),
                    &["side", "pressure"],
                )),
            OperationDescriptor::new("stick", "Deflect a thumbstick; persists until changed unless duration_ms is given")
                .with_parameters_schema(object_schema(
                    json!({
                        "side": side,
                        "x": axis,
                        "y": axis,
                        "duration_ms": duration_schema(None),
                    }),
                    &["side", "x", "y"],
                )),
            OperationDescriptor::new("reset", "Return every button and axis to neutral"),
            OperationDescriptor::new("state", "Held buttons and axis positions").read_only(),
        ]
    }

    async fn execute(
        &self,
        operation: &str,
        params: serde_json::Value,
        _ctx: &InvocationContext,
    ) -> Result<ActionResult, ActionError> {
        match operation {
            "button" => self.button(from_params(params)?).await,
            "trigger" => self.trigger(from_params(params)?).await,
            "stick" => self.stick(from_params(params)?).await,
            "reset" => self.reset().await,
            "state" => Ok(ActionSummary::new(NAME, "state")
                .field("state", self.state())
                .into_result()),
            other => Err(ActionError::unknown_operation(NAME, other)),
        }
    }
}
