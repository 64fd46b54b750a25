//! Capability and operation descriptors.

use serde::{Deserialize, Serialize};

/// Coarse grouping used for discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityCategory {
    Input,
    Vision,
    System,
}

/// Whether an operation changes external device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    Mutating,
    ReadOnly,
}

impl Default for SideEffect {
    fn default() -> Self {
        Self::Mutating
    }
}

/// Identity of a capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Registry key, unique per process.
    pub name: String,

    pub category: CapabilityCategory,

    /// Human-readable description.
    pub description: String,
}

impl CapabilityDescriptor {
    pub fn new(
        name: impl Into<String>,
        category: CapabilityCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            description: description.into(),
        }
    }
}

/// Definition of a single operation exposed by a capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Name, unique within its capability.
    pub name: String,

    pub description: String,

    /// JSON Schema for the parameters.
    pub parameters_schema: serde_json::Value,

    #[serde(default)]
    pub side_effect: SideEffect,
}

impl OperationDescriptor {
    /// Create a mutating operation with an empty object schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema: empty_object_schema(),
            side_effect: SideEffect::Mutating,
        }
    }

    /// Set the parameters schema.
    pub fn with_parameters_schema(mut self, schema: serde_json::Value) -> Self {
        self.parameters_schema = schema;
        self
    }

    /// Mark the operation as a read-only query.
    pub fn read_only(mut self) -> Self {
        self.side_effect = SideEffect::ReadOnly;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.side_effect == SideEffect::ReadOnly
    }
}

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}
