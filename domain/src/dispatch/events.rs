//! Messages exchanged with executors and the conversation loop

use crate::result::content::{ResultBlock, ResultKind};
use crate::run::entities::{RunContext, RunOutcome, ToolRunId};
use crate::turn::message::TurnRole;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Terminal result of one tool run, as reported by an executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub tool_run_id: ToolRunId,
    #[serde(default)]
    pub content: Value,
    pub result_kind: ResultKind,
    #[serde(default)]
    pub is_error: bool,
}

impl Completion {
    pub fn success(tool_run_id: ToolRunId, content: Value, result_kind: ResultKind) -> Self {
        Self {
            tool_run_id,
            content,
            result_kind,
            is_error: false,
        }
    }

    /// An error completion carrying `{"error": message}`.
    pub fn error(tool_run_id: ToolRunId, message: impl Into<String>) -> Self {
        Self {
            tool_run_id,
            content: json!({ "error": message.into() }),
            result_kind: ResultKind::Error,
            is_error: true,
        }
    }

    pub fn outcome(&self) -> RunOutcome {
        RunOutcome {
            result: self.content.clone(),
            kind: self.result_kind,
            is_error: self.is_error,
        }
    }
}

/// Conversation handed to another agent by `invoke_agent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffEvent {
    pub from_agent_id: String,
    pub to_agent_id: String,
    pub tool_run_id: ToolRunId,
    pub new_message: Value,
}

impl HandoffEvent {
    /// Build the event from an `invoke_agent` input.
    ///
    /// Returns `None` unless both `query` and `agent_id` are strings.
    pub fn from_input(from_agent_id: &str, tool_run_id: ToolRunId, input: &Value) -> Option<Self> {
        let query = input.get("query").and_then(Value::as_str)?;
        let to_agent_id = input.get("agent_id").and_then(Value::as_str)?;

        Some(Self {
            from_agent_id: from_agent_id.to_string(),
            to_agent_id: to_agent_id.to_string(),
            tool_run_id,
            new_message: json!({
                "role": TurnRole::User.as_str(),
                "content": [{"type": "text", "text": query}],
            }),
        })
    }
}

/// Result blocks handed back to the conversation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    pub agent_id: String,
    pub recipient_id: String,
    pub thread_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    pub role: TurnRole,
    pub result_blocks: Vec<ResultBlock>,
}

impl AggregatedResult {
    pub fn new(context: &RunContext, result_blocks: Vec<ResultBlock>) -> Self {
        Self {
            agent_id: context.agent_id.clone(),
            recipient_id: context.recipient_id.clone(),
            thread_id: context.thread_id.clone(),
            connection_id: context.connection_id.clone(),
            role: TurnRole::User,
            result_blocks,
        }
    }

    pub fn block_ids(&self) -> Vec<&str> {
        self.result_blocks
            .iter()
            .map(|b| b.tool_use_id.as_str())
            .collect()
    }
}
