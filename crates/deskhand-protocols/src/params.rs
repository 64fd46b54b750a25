//! Typed parameter extraction.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ActionError;

/// Deserialize an operation's parameter bag, mapping failures onto
/// [`ActionError::InvalidParameter`]. A `null` bag is treated as `{}`.
pub fn from_params<T: DeserializeOwned>(params: Value) -> Result<T, ActionError> {
    let params = match params {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| describe(&e.to_string()))
}

fn describe(message: &str) -> ActionError {
    if let Some(field) = message
        .strip_prefix("missing field ")
        .and_then(backticked)
    {
        return ActionError::invalid_parameter(field, format!("{} is required", field));
    }
    if let Some(field) = message
        .strip_prefix("unknown field ")
        .and_then(backticked)
    {
        return ActionError::invalid_parameter(field, format!("{} is not a recognised parameter", field));
    }
    ActionError::invalid_parameter("params", message.to_string())
}

fn backticked(s: &str) -> Option<&str> {
    let rest = s.strip_prefix('`')?;
    let end = rest.find('`')?;
    Some(&rest[..end])
}
