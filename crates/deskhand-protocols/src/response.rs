//! Caller-visible response envelope.

use serde::{Deserialize, Serialize};

use crate::capability::{ActionResult, ContentItem};
use crate::error::ActionError;

/// Structured error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl From<&ActionError> for ErrorPayload {
    fn from(err: &ActionError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            context: err.context(),
        }
    }
}

/// Outcome of a router call. Failures are values, never panics or `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub success: bool,

    #[serde(default)]
    pub content: Vec<ContentItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl InvocationResponse {
    pub fn ok(result: ActionResult) -> Self {
        Self {
            success: true,
            content: result.content,
            error: None,
        }
    }

    pub fn failure(err: &ActionError) -> Self {
        Self {
            success: false,
            content: Vec::new(),
            error: Some(ErrorPayload::from(err)),
        }
    }

    /// Kind of the carried error, if this is a failure.
    pub fn error_kind(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.kind.as_str())
    }
}

impl From<Result<ActionResult, ActionError>> for InvocationResponse {
    fn from(result: Result<ActionResult, ActionError>) -> Self {
        match result {
            Ok(result) => Self::ok(result),
            Err(err) => Self::failure(&err),
        }
    }
}
