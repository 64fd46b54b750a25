//! Textual summary attached to every successful operation.

use serde::Serialize;
use serde_json::Value;

use super::{ActionResult, ContentItem, TargetId};

/// Builder for the `key: value` summary text of an operation.
///
/// Values are rendered as compact JSON, so a coordinate shows up as
/// `coordinate: [100,200]`.
#[derive(Debug, Clone)]
pub struct ActionSummary {
    capability: String,
    operation: String,
    fields: Vec<(String, Value)>,
    target: Option<TargetId>,
}

impl ActionSummary {
    pub fn new(capability: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            operation: operation.into(),
            fields: Vec::new(),
            target: None,
        }
    }

    /// Echo a parameter or outcome value.
    pub fn field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.fields.push((key.into(), value));
        self
    }

    pub fn target(mut self, target: Option<TargetId>) -> Self {
        self.target = target;
        self
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("capability: {}", self.capability),
            format!("action: {}", self.operation),
        ];
        for (key, value) in &self.fields {
            lines.push(format!("{}: {}", key, value));
        }
        match self.target {
            Some(id) => lines.push(format!("target: {}", id)),
            None => lines.push("target: focused".to_string()),
        }
        lines.join("\n")
    }

    pub fn into_result(self) -> ActionResult {
        ActionResult::text(self.render())
    }

    pub fn into_item(self) -> ContentItem {
        ContentItem::text(self.render())
    }
}
