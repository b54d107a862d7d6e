//! Dispatch plan and per-family requests

use super::events::Completion;
use crate::run::entities::ToolRunId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Engine name the workflow process supervisor runs remote code with.
pub const WORKFLOW_ENGINE: &str = "process";

/// Request to call an HTTP-backed tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneRequest {
    pub tool_run_id: ToolRunId,
    pub tool_name: String,
    pub input: Value,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Request for the workflow process supervisor to run remote code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRequest {
    /// Deterministic workflow run id derived from `source_run_id`
    pub tool_run_id: Uuid,
    /// Run the supervisor reports its completion against
    pub source_run_id: ToolRunId,
    pub tool_definition_id: String,
    pub input: Value,
    pub engine: String,
}

impl WorkflowRequest {
    pub fn new(source_run_id: ToolRunId, tool_definition_id: impl Into<String>, input: Value) -> Self {
        Self {
            tool_run_id: workflow_run_id(&source_run_id),
            source_run_id,
            tool_definition_id: tool_definition_id.into(),
            input,
            engine: WORKFLOW_ENGINE.to_string(),
        }
    }
}

/// Name-based UUID (v5, nil namespace) of a run id.
///
/// Redelivered dispatches map to the same workflow run.
pub fn workflow_run_id(run_id: &ToolRunId) -> Uuid {
    Uuid::new_v5(&Uuid::nil(), run_id.as_str().as_bytes())
}

/// Request for an MCP server. Accepted into plans; no executor runs it yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpRequest {
    pub tool_run_id: ToolRunId,
    pub tool_name: String,
    pub input: Value,
}

/// Typed leaves produced by decomposing one model turn.
///
/// Every dispatchable run appears in exactly one family list.
/// `immediate_failures` holds completions for runs that have a row but can
/// never be executed (an empty batch, an internal tool with no executor);
/// they are fed straight back into fan-in so their parent is not left waiting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchPlan {
    pub standalone: Vec<StandaloneRequest>,
    pub workflow: Vec<WorkflowRequest>,
    pub mcp: Vec<McpRequest>,
    pub immediate_failures: Vec<Completion>,
}

impl DispatchPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another plan, keeping order within each list.
    pub fn merge(&mut self, other: DispatchPlan) {
        self.standalone.extend(other.standalone);
        self.workflow.extend(other.workflow);
        self.mcp.extend(other.mcp);
        self.immediate_failures.extend(other.immediate_failures);
    }

    /// Number of requests handed to executors.
    pub fn dispatch_count(&self) -> usize {
        self.standalone.len() + self.workflow.len() + self.mcp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatch_count() == 0 && self.immediate_failures.is_empty()
    }

    /// Run ids of every dispatched leaf, family by family.
    pub fn dispatched_run_ids(&self) -> Vec<&ToolRunId> {
        self.standalone
            .iter()
            .map(|r| &r.tool_run_id)
            .chain(self.workflow.iter().map(|r| &r.source_run_id))
            .chain(self.mcp.iter().map(|r| &r.tool_run_id))
            .collect()
    }
}
