//! Capability trait definition.

use async_trait::async_trait;

use super::{ActionResult, CapabilityDescriptor, InvocationContext, OperationDescriptor};
use crate::error::ActionError;

/// Core trait for capability handlers.
///
/// A capability owns its internal state (e.g. persisted stick position) and
/// exposes it only through [`Capability::execute`].
#[async_trait]
pub trait Capability: Send + Sync {
    /// Returns the capability descriptor.
    fn descriptor(&self) -> &CapabilityDescriptor;

    /// Enumerate the operations this capability supports. Pure and deterministic.
    fn operations(&self) -> Vec<OperationDescriptor>;

    /// Execute a named operation.
    async fn execute(
        &self,
        operation: &str,
        params: serde_json::Value,
        ctx: &InvocationContext,
    ) -> Result<ActionResult, ActionError>;

    /// Registry name of this capability.
    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Look up a single operation descriptor by name.
    fn operation(&self, name: &str) -> Option<OperationDescriptor> {
        self.operations().into_iter().find(|op| op.name == name)
    }

    /// Validate the parameter bag shape before execution.
    fn validate(&self, params: &serde_json::Value) -> Result<(), ActionError> {
        if params.is_object() || params.is_null() {
            Ok(())
        } else {
            Err(ActionError::invalid_parameter(
                "params",
                "parameters must be an object",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilityCategory, TargetContext};

    struct EchoCapability {
        descriptor: CapabilityDescriptor,
    }

    impl EchoCapability {
        fn new() -> Self {
            Self {
                descriptor: CapabilityDescriptor::new(
                    "echo",
                    CapabilityCategory::System,
                    "Echoes its parameters",
                ),
            }
        }
    }

    #[async_trait]
    impl Capability for EchoCapability {
        fn descriptor(&self) -> &CapabilityDescriptor {
            &self.descriptor
        }

        fn operations(&self) -> Vec<OperationDescriptor> {
            vec![
                OperationDescriptor::new("say", "Echo the params"),
                OperationDescriptor::new("peek", "Read-only").read_only(),
            ]
        }

        async fn execute(
            &self,
            operation: &str,
            params: serde_json::Value,
            _ctx: &InvocationContext,
        ) -> Result<ActionResult, ActionError> {
            match operation {
                "say" => Ok(ActionResult::text(params.to_string())),
                "peek" => Ok(ActionResult::text("ok")),
                other => Err(ActionError::unknown_operation(self.name(), other)),
            }
        }
    }

    #[test]
    fn test_name_comes_from_descriptor() {
        let cap = EchoCapability::new();
        assert_eq!(cap.name(), "echo");
    }

    #[test]
    fn test_operation_lookup() {
        let cap = EchoCapability::new();
        assert!(cap.operation("peek").unwrap().is_read_only());
        assert!(cap.operation("missing").is_none());
    }

    #[test]
    fn test_validate_rejects_non_objects() {
        let cap = EchoCapability::new();
        assert!(cap.validate(&serde_json::json!({})).is_ok());
        assert!(cap.validate(&serde_json::Value::Null).is_ok());
        let err = cap.validate(&serde_json::json!([1, 2])).unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[tokio::test]
    async fn test_execute_unknown_operation() {
        let cap = EchoCapability::new();
        let ctx = InvocationContext::new(TargetContext::new());
        let err = cap
            .execute("shout", serde_json::json!({}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::UnknownOperation { .. }));
    }
}
