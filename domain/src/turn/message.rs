//! Inbound model turn and dispatch trigger

use crate::core::error::DomainError;
use crate::run::entities::RunContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// A single tool use the model asked for, as parsed from the provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseRequest {
    /// Provider-issued tool use id; becomes the run id
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input: Value,
}

impl ToolUseRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// One content block of a model turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnBlock {
    Text { text: String },
    ToolUse(ToolUseRequest),
}

/// An already-parsed model turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTurn {
    pub role: TurnRole,
    pub content: Vec<TurnBlock>,
}

impl ModelTurn {
    pub fn assistant(content: Vec<TurnBlock>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content,
        }
    }

    /// Tool use requests in the order the model emitted them.
    pub fn tool_uses(&self) -> impl Iterator<Item = &ToolUseRequest> {
        self.content.iter().filter_map(|block| match block {
            TurnBlock::ToolUse(request) => Some(request),
            TurnBlock::Text { .. } => None,
        })
    }

    /// Check the turn is a model turn with at least one tool use.
    pub fn requested_tools(&self) -> Result<Vec<&ToolUseRequest>, DomainError> {
        if self.role != TurnRole::Assistant {
            return Err(DomainError::NotModelTurn(self.role.as_str().to_string()));
        }
        let uses: Vec<_> = self.tool_uses().collect();
        if uses.is_empty() {
            return Err(DomainError::NoToolUse);
        }
        Ok(uses)
    }
}

/// Inbound request to decompose and dispatch one model turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchTrigger {
    pub agent_id: String,
    pub recipient_id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Absent for turns that did not come in over a socket
    #[serde(default)]
    pub connection_id: Option<String>,
    pub message: ModelTurn,
}

impl DispatchTrigger {
    /// Conversation context copied onto every run created for this turn.
    pub fn context(&self) -> Result<RunContext, DomainError> {
        let thread_id = self
            .thread_id
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(DomainError::MissingContext("threadId"))?;

        let mut context = RunContext::new(thread_id, &self.agent_id, &self.recipient_id);
        context.connection_id = self.connection_id.clone();
        Ok(context)
    }
}
