//! Sequence request and record types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use deskhand_protocols::{
    ActionError, ContentItem, ErrorPayload, InvocationResponse, TargetId,
};

/// Parameter key carrying an explicit target id.
pub const TARGET_FIELD: &str = "target";

fn default_true() -> bool {
    true
}

/// One entry of a caller-specified sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceCommand {
    pub capability: String,
    pub operation: String,
    #[serde(default)]
    pub params: Value,
    /// Append this step's full result to the output.
    #[serde(default)]
    pub capture: bool,
}

impl SequenceCommand {
    pub fn new(capability: impl Into<String>, operation: impl Into<String>, params: Value) -> Self {
        Self {
            capability: capability.into(),
            operation: operation.into(),
            params,
            capture: false,
        }
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Params with `shared` merged in under the target field, unless the
    /// command carries its own target. Params must be an object or null.
    pub fn params_with_target(&self, shared: Option<TargetId>) -> Result<Value, ActionError> {
        let mut map = match &self.params {
            Value::Null => serde_json::Map::new(),
            Value::Object(map) => map.clone(),
            _ => {
                return Err(ActionError::invalid_parameter(
                    "params",
                    "parameters must be an object",
                ))
            }
        };
        if let Some(target) = shared {
            map.entry(TARGET_FIELD).or_insert(Value::from(target));
        }
        Ok(Value::Object(map))
    }
}

/// Execution policy for one sequence call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePolicy {
    #[serde(default)]
    pub capture_intermediate: bool,
    #[serde(default = "default_true")]
    pub stop_on_error: bool,
    #[serde(default)]
    pub delay_between_ms: u64,
}

impl Default for SequencePolicy {
    fn default() -> Self {
        Self {
            capture_intermediate: false,
            stop_on_error: true,
            delay_between_ms: 0,
        }
    }
}

impl SequencePolicy {
    /// Policy used by autopress ticks: keep going past failures, capture nothing.
    pub fn repeating() -> Self {
        Self {
            capture_intermediate: false,
            stop_on_error: false,
            delay_between_ms: 0,
        }
    }
}

/// Inbound sequence call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRequest {
    /// Shared target applied to steps that do not name their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetId>,
    pub commands: Vec<SequenceCommand>,
    #[serde(flatten)]
    pub policy: SequencePolicy,
}

impl SequenceRequest {
    pub fn new(commands: Vec<SequenceCommand>) -> Self {
        Self {
            target: None,
            commands,
            policy: SequencePolicy::default(),
        }
    }

    pub fn with_target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_policy(mut self, policy: SequencePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Overall status of a sequence run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceStatus {
    Success,
    /// Some steps failed but execution continued.
    Partial,
    /// Execution halted on a failure, or the request was rejected.
    Error,
}

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub index: usize,
    pub capability: String,
    pub operation: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Aggregate record of one sequence call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub status: SequenceStatus,
    /// Number of commands in the request.
    pub total: usize,
    /// Number of commands attempted.
    pub executed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub steps: Vec<StepOutcome>,
    /// Captured content followed by the textual execution summary.
    pub content: Vec<ContentItem>,
    /// Error that halted or rejected the sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl SequenceRecord {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            status: SequenceStatus::Success,
            total,
            executed: 0,
            succeeded: 0,
            failed: 0,
            steps: Vec::with_capacity(total),
            content: Vec::new(),
            error: None,
        }
    }

    /// A record for a request refused before any step ran.
    pub fn rejected(total: usize, err: &ActionError) -> Self {
        let mut record = Self::new(total);
        record.status = SequenceStatus::Error;
        record.error = Some(ErrorPayload::from(err));
        record.content.push(ContentItem::text(record.summary_text()));
        record
    }

    pub(crate) fn record(&mut self, outcome: StepOutcome) {
        self.executed += 1;
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.steps.push(outcome);
    }

    /// JSON execution summary: status, counts and per-step outcomes.
    pub fn summary(&self) -> Value {
        let mut summary = serde_json::json!({
            "status": self.status,
            "total": self.total,
            "executed": self.executed,
            "succeeded": self.succeeded,
            "failed": self.failed,
            "steps": self.steps,
        });
        if let Some(error) = &self.error {
            summary["error"] = serde_json::json!(error);
        }
        summary
    }

    pub(crate) fn summary_text(&self) -> String {
        serde_json::to_string_pretty(&self.summary()).unwrap_or_default()
    }

    pub fn is_success(&self) -> bool {
        self.status == SequenceStatus::Success
    }

    /// Convert into the router envelope. `partial` still counts as success.
    pub fn into_response(self) -> InvocationResponse {
        InvocationResponse {
            success: self.status != SequenceStatus::Error,
            content: self.content,
            error: self.error,
        }
    }
}
