//! Backend errors.

use thiserror::Error;

use deskhand_protocols::ActionError;

/// Failure reported by a device backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend cannot run here; `remediation` tells the user how to fix it.
    #[error("{message}")]
    Unavailable { message: String, remediation: String },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("{0}")]
    Failed(String),
}

impl BackendError {
    pub fn unavailable(message: impl Into<String>, remediation: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            remediation: remediation.into(),
        }
    }
}

impl From<BackendError> for ActionError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable {
                message,
                remediation,
            } => ActionError::backend_unavailable(message, remediation),
            BackendError::InvalidKey(key) => {
                ActionError::invalid_parameter("key", format!("unknown key '{}'", key))
            }
            other => ActionError::ExecutionFailed(other.to_string()),
        }
    }
}
