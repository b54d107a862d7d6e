//! Tool run entities

use crate::result::content::ResultKind;
use crate::tool::entities::{FAN_OUT_PARENT, ToolDefinition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of a tool run.
///
/// Top-level runs reuse the id issued by the model provider for the tool use
/// request; synthetic and nested runs get a UUID derived from their position
/// in the tree, so expanding the same turn twice yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolRunId(String);

impl ToolRunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Deterministic id for `seed`.
    pub fn derived(seed: &str) -> Self {
        Self(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, seed.as_bytes()).to_string())
    }

    /// Id of the `index`-th child expanded from this run.
    pub fn child(&self, index: usize) -> Self {
        Self::derived(&format!("{}/{}", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ToolRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<String>> From<T> for ToolRunId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

/// Lifecycle status of a tool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolRunStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl ToolRunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ToolRunStatus::Pending => "PENDING",
            ToolRunStatus::Running => "RUNNING",
            ToolRunStatus::Success => "SUCCESS",
            ToolRunStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ToolRunStatus::Success | ToolRunStatus::Failed)
    }
}

impl std::fmt::Display for ToolRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Conversational context copied from the triggering model turn.
///
/// Needed to address the aggregated result back to the right conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub thread_id: String,
    pub agent_id: String,
    pub recipient_id: String,
    /// Absent for turns that did not arrive over a live connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

impl RunContext {
    pub fn new(
        thread_id: impl Into<String>,
        agent_id: impl Into<String>,
        recipient_id: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            agent_id: agent_id.into(),
            recipient_id: recipient_id.into(),
            connection_id: None,
        }
    }

    pub fn with_connection(mut self, connection_id: impl Into<String>) -> Self {
        self.connection_id = Some(connection_id.into());
        self
    }
}

/// Row to insert. The repository assigns `created_at` and the creation sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewToolRun {
    pub id: ToolRunId,
    pub parent_run_id: Option<ToolRunId>,
    /// Catalog id of the resolved tool; `None` for the synthetic fan-out parent.
    pub tool_id: Option<String>,
    pub tool_name: String,
    pub input: serde_json::Value,
    pub context: RunContext,
}

impl NewToolRun {
    /// A run for a resolved catalog tool.
    pub fn for_tool(
        id: impl Into<ToolRunId>,
        tool: &ToolDefinition,
        input: serde_json::Value,
        context: RunContext,
    ) -> Self {
        Self {
            id: id.into(),
            parent_run_id: None,
            tool_id: Some(tool.id.clone()),
            tool_name: tool.name.clone(),
            input,
            context,
        }
    }

    /// The synthetic parent grouping sibling tool uses of one model turn.
    ///
    /// The id is derived from the sibling tool use ids.
    pub fn fan_out_parent<'a>(
        tool_use_ids: impl IntoIterator<Item = &'a str>,
        context: RunContext,
    ) -> Self {
        let seed = tool_use_ids.into_iter().collect::<Vec<_>>().join(",");
        Self {
            id: ToolRunId::derived(&format!("{}:{}", FAN_OUT_PARENT, seed)),
            parent_run_id: None,
            tool_id: None,
            tool_name: FAN_OUT_PARENT.to_string(),
            input: serde_json::Value::Object(serde_json::Map::new()),
            context,
        }
    }

    pub fn with_parent(mut self, parent: Option<ToolRunId>) -> Self {
        self.parent_run_id = parent;
        self
    }
}

/// Terminal outcome reported by an executor for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub result: serde_json::Value,
    pub kind: ResultKind,
    pub is_error: bool,
}

impl RunOutcome {
    pub fn status(&self) -> ToolRunStatus {
        if self.is_error {
            ToolRunStatus::Failed
        } else {
            ToolRunStatus::Success
        }
    }
}

/// One persisted tool invocation attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRun {
    pub id: ToolRunId,
    pub parent_run_id: Option<ToolRunId>,
    pub tool_id: Option<String>,
    pub tool_name: String,
    pub input: serde_json::Value,
    pub status: ToolRunStatus,
    /// Set only on the terminal transition.
    pub result: Option<serde_json::Value>,
    /// Result kind declared by the completion that finished this run.
    pub result_kind: Option<ResultKind>,
    pub duration: Option<Duration>,
    pub context: RunContext,
    pub created_at: DateTime<Utc>,
    /// Monotonic creation sequence; orders siblings by creation.
    pub seq: u64,
}

impl ToolRun {
    /// Materialize a new row in `Pending` state.
    pub fn from_new(new: NewToolRun, created_at: DateTime<Utc>, seq: u64) -> Self {
        Self {
            id: new.id,
            parent_run_id: new.parent_run_id,
            tool_id: new.tool_id,
            tool_name: new.tool_name,
            input: new.input,
            status: ToolRunStatus::Pending,
            result: None,
            result_kind: None,
            duration: None,
            context: new.context,
            created_at,
            seq,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether inserting `new` would write this same row again.
    pub fn is_same_insert(&self, new: &NewToolRun) -> bool {
        self.id == new.id
            && self.parent_run_id == new.parent_run_id
            && self.tool_id == new.tool_id
            && self.tool_name == new.tool_name
            && self.input == new.input
            && self.context == new.context
    }

    pub fn is_failed(&self) -> bool {
        self.status == ToolRunStatus::Failed
    }

    /// Whether this is the synthetic parent created for sibling tool uses.
    pub fn is_fan_out_parent(&self) -> bool {
        self.tool_name == FAN_OUT_PARENT
    }

    /// Elapsed time from creation to `now` (zero if the clock went backwards).
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).to_std().unwrap_or_default()
    }

    /// Transition from Pending to Running.
    ///
    /// No-op if already past Pending.
    pub fn mark_running(&mut self) -> bool {
        if self.status == ToolRunStatus::Pending {
            self.status = ToolRunStatus::Running;
            true
        } else {
            false
        }
    }

    /// Record the executor outcome.
    ///
    /// Returns `false` without touching the row if it is already terminal.
    pub fn finish(&mut self, outcome: RunOutcome, now: DateTime<Utc>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = outcome.status();
        // A null payload is stored as no result
        self.result = (!outcome.result.is_null()).then_some(outcome.result);
        self.result_kind = Some(outcome.kind);
        self.duration = Some(self.elapsed(now));
        true
    }

    /// Derived terminal transition for a parent whose children all finished.
    ///
    /// Returns `false` if the parent is already terminal, so only one caller
    /// ever wins the transition.
    pub fn complete_as_parent(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = ToolRunStatus::Success;
        self.duration = Some(self.elapsed(now));
        true
    }
}
