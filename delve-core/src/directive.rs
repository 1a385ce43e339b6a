use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DelveError;

/// A tool invocation requested by the model for the current round.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ToolCall {
    pub tool: String,
    pub input: String,
}

/// A completed tool call together with its textual output. Records are fed
/// into the next round's prompt and nowhere else; anything the model wants to
/// keep must be copied into a memory block.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ToolRecord {
    pub tool: String,
    pub input: String,
    pub output: String,
}

impl ToolRecord {
    pub fn from_call(call: ToolCall, output: String) -> Self {
        Self {
            tool: call.tool,
            input: call.input,
            output,
        }
    }
}

/// One memory mutation. The operation field is deliberately left as a plain
/// string: unrecognized operations are ignored rather than rejected, so a
/// slightly off-script model does not lose the whole round.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct BlockOp {
    #[serde(default)]
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl BlockOp {
    pub fn add(content: impl Into<String>) -> Self {
        Self {
            operation: "add".to_string(),
            content: Some(content.into()),
            id: None,
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self {
            operation: "delete".to_string(),
            content: None,
            id: Some(id.into()),
        }
    }
}

/// The validated payload of one agent round. `tool_calls` is the only
/// required field; everything else falls back to a documented default when
/// the model omits it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Directive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_updates: Option<Vec<BlockOp>>,
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl Directive {
    /// The sole trust boundary between untrusted model output and a typed
    /// round payload. A payload without `tool_calls` fails the round.
    pub fn from_json(value: Value) -> Result<Self, DelveError> {
        let has_tool_calls = value
            .get("tool_calls")
            .map(|calls| !calls.is_null())
            .unwrap_or(false);
        if !has_tool_calls {
            return Err(DelveError::ParseFailed {
                output: value.to_string(),
                reason: "missing tool_calls".to_string(),
            });
        }
        serde_json::from_value(value).map_err(DelveError::Serde)
    }
}
