//! Tool domain entities

use super::value_objects::ToolConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Control tool whose input is a list of further tool invocations.
pub const BATCH_TOOL: &str = "batch_tool";

/// Control tool that hands the conversation off to another agent.
pub const INVOKE_AGENT: &str = "invoke_agent";

/// Tool name of the synthetic parent grouping sibling tool uses of one turn.
///
/// Never a resolvable catalog entry.
pub const FAN_OUT_PARENT: &str = "__parallel_fan_out";

/// Transport protocol of an MCP server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpProtocol {
    Stdio,
    Sse,
    Grpc,
}

impl McpProtocol {
    pub fn as_str(&self) -> &str {
        match self {
            McpProtocol::Stdio => "stdio",
            McpProtocol::Sse => "sse",
            McpProtocol::Grpc => "grpc",
        }
    }
}

impl std::fmt::Display for McpProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Execution family configuration of a catalog entry.
///
/// Exactly one family per tool. `Internal` covers the control tools
/// (`batch_tool`, `invoke_agent`) which are expanded by the engine itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolConfig {
    /// HTTP endpoint
    Standalone {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        /// Input schema
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    },
    /// Remote code run by the workflow process supervisor
    Workflow {
        s3_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    },
    /// Model Context Protocol server (execution not supported yet)
    Mcp {
        entrypoint: String,
        protocol: McpProtocol,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        env_vars: Option<HashMap<String, String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
    },
    /// Handled inside the engine
    Internal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    },
}

impl ToolConfig {
    pub fn family(&self) -> &str {
        match self {
            ToolConfig::Standalone { .. } => "standalone",
            ToolConfig::Workflow { .. } => "workflow",
            ToolConfig::Mcp { .. } => "mcp",
            ToolConfig::Internal { .. } => "internal",
        }
    }

    /// Check the family-specific required fields.
    pub fn validate(&self) -> Result<(), ToolConfigError> {
        match self {
            ToolConfig::Standalone { url, .. } => {
                if url.is_empty() {
                    return Err(ToolConfigError::MissingField("url"));
                }
                let parsed = url::Url::parse(url)
                    .map_err(|e| ToolConfigError::InvalidUrl(format!("{}: {}", url, e)))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ToolConfigError::InvalidScheme {
                        expected: "http or https",
                        actual: parsed.scheme().to_string(),
                    });
                }
                Ok(())
            }
            ToolConfig::Workflow { s3_url, .. } => {
                if s3_url.is_empty() {
                    return Err(ToolConfigError::MissingField("s3_url"));
                }
                let parsed = url::Url::parse(s3_url)
                    .map_err(|e| ToolConfigError::InvalidUrl(format!("{}: {}", s3_url, e)))?;
                if parsed.scheme() != "s3" {
                    return Err(ToolConfigError::InvalidScheme {
                        expected: "s3",
                        actual: parsed.scheme().to_string(),
                    });
                }
                Ok(())
            }
            ToolConfig::Mcp {
                entrypoint,
                protocol,
                env_vars,
                ..
            } => {
                if entrypoint.is_empty() {
                    return Err(ToolConfigError::MissingField("entrypoint"));
                }
                if *protocol == McpProtocol::Stdio && env_vars.is_none() {
                    return Err(ToolConfigError::MissingField("env_vars"));
                }
                Ok(())
            }
            ToolConfig::Internal { .. } => Ok(()),
        }
    }
}

/// Catalog entry: a tool the model may request by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Stable catalog id (referenced by runs and workflow requests)
    pub id: String,
    /// Unique name the model uses (e.g., "lookup")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Execution family
    pub config: ToolConfig,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, config: ToolConfig) -> Self {
        let name = name.into();
        Self {
            id: uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, name.as_bytes()).to_string(),
            name,
            description: description.into(),
            config,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn standalone(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            name,
            "",
            ToolConfig::Standalone {
                url: url.into(),
                api_key: None,
                params: None,
            },
        )
    }

    pub fn workflow(name: impl Into<String>, s3_url: impl Into<String>) -> Self {
        Self::new(
            name,
            "",
            ToolConfig::Workflow {
                s3_url: s3_url.into(),
                params: None,
            },
        )
    }

    pub fn internal(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, ToolConfig::Internal { params: None })
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.config, ToolConfig::Internal { .. })
    }
}

/// Name-indexed set of tool definitions
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// The two control tools, registered as internal tools.
    pub fn with_control_tools() -> Self {
        Self::new()
            .register(ToolDefinition::internal(
                BATCH_TOOL,
                "Invoke several tools in one call; results are returned together.",
            ))
            .register(ToolDefinition::internal(
                INVOKE_AGENT,
                "Hand the conversation off to another agent.",
            ))
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    /// Register only if no tool with the same name exists (builder pattern)
    pub fn register_if_absent(mut self, tool: ToolDefinition) -> Self {
        self.tools.entry(tool.name.clone()).or_insert(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
