//! Action execution errors.

use serde_json::{json, Value};
use thiserror::Error;

use crate::capability::TargetId;

/// Failure raised while resolving or executing an operation.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Unknown capability, autopress id or operation identifier.
    #[error("{entity} not found: {name}")]
    NotFound { entity: &'static str, name: String },

    #[error("Unknown operation '{operation}' for capability '{capability}'")]
    UnknownOperation { capability: String, operation: String },

    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Invalid target {target}: {}", valid_range(.count))]
    InvalidTarget { target: TargetId, count: usize },

    #[error("Backend unavailable: {message}. {remediation}")]
    BackendUnavailable { message: String, remediation: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

fn valid_range(count: &usize) -> String {
    if *count == 0 {
        "no targets are available".to_string()
    } else {
        format!("valid target ids are 0-{}", count - 1)
    }
}

impl ActionError {
    pub fn not_found(entity: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            name: name.into(),
        }
    }

    pub fn unknown_operation(capability: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            capability: capability.into(),
            operation: operation.into(),
        }
    }

    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn backend_unavailable(message: impl Into<String>, remediation: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
            remediation: remediation.into(),
        }
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::UnknownOperation { .. } => "unknown_operation",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::InvalidTarget { .. } => "invalid_target",
            Self::BackendUnavailable { .. } => "backend_unavailable",
            Self::InvalidConfig(_) => "invalid_config",
            Self::ExecutionFailed(_) => "execution_failed",
        }
    }

    /// Structured details a caller can act on, when the variant has any.
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::NotFound { entity, name } => Some(json!({ "entity": entity, "name": name })),
            Self::UnknownOperation {
                capability,
                operation,
            } => Some(json!({ "capability": capability, "operation": operation })),
            Self::InvalidParameter { field, .. } => Some(json!({ "field": field })),
            Self::InvalidTarget { target, count } => {
                let valid = if *count == 0 {
                    Value::Null
                } else {
                    json!([0, count - 1])
                };
                Some(json!({ "target": target, "count": count, "valid_range": valid }))
            }
            Self::BackendUnavailable { remediation, .. } => {
                Some(json!({ "remediation": remediation }))
            }
            Self::InvalidConfig(_) | Self::ExecutionFailed(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
