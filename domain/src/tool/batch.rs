//! `batch_tool` input parsing.
//!
//! A batch input looks like:
//!
//! ```json
//! {"invocations": [
//!     {"name": "x", "arguments": "{\"q\": 1}"},
//!     {"name": "y", "arguments": {"q": 2}}
//! ]}
//! ```
//!
//! Models emit `arguments` either as a JSON-encoded string or as an object;
//! both are accepted.

use super::value_objects::BatchInputError;
use serde_json::{Map, Value};

/// One parsed child invocation of a `batch_tool` request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInvocation {
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// Parse the `invocations` list of a `batch_tool` input.
///
/// The outer `Err` means the list itself is malformed. Each inner `Err`
/// concerns one invocation only, so callers can skip it and keep going.
pub fn parse_invocations(
    input: &Value,
) -> Result<Vec<Result<BatchInvocation, BatchInputError>>, BatchInputError> {
    let invocations = input
        .get("invocations")
        .and_then(Value::as_array)
        .ok_or(BatchInputError::NotAList)?;

    Ok(invocations
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_invocation(index, raw))
        .collect())
}

fn parse_invocation(index: usize, raw: &Value) -> Result<BatchInvocation, BatchInputError> {
    let object = raw
        .as_object()
        .ok_or(BatchInputError::NotAnObject { index })?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or(BatchInputError::MissingName { index })?;

    let arguments = match object.get("arguments") {
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(BatchInputError::InvalidJson {
                    index,
                    reason: "decoded arguments are not an object".to_string(),
                });
            }
            Err(e) => {
                return Err(BatchInputError::InvalidJson {
                    index,
                    reason: e.to_string(),
                });
            }
        },
        Some(Value::Object(map)) => map.clone(),
        _ => return Err(BatchInputError::UnsupportedArguments { index }),
    };

    Ok(BatchInvocation {
        name: name.to_string(),
        arguments,
    })
}
