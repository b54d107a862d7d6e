//! Tool catalog and agent entries (`[[tools]]`, `[agents.<id>]`)

use serde::{Deserialize, Serialize};
use toolrun_domain::{ToolConfig, ToolDefinition};

/// One `[[tools]]` entry
///
/// ```toml
/// [[tools]]
/// name = "lookup"
/// description = "Look up a term"
/// type = "standalone"
/// url = "https://tools.example.com/lookup"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileToolEntry {
    /// Catalog id; derived from the name when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub config: ToolConfig,
}

impl FileToolEntry {
    pub fn to_definition(&self) -> ToolDefinition {
        let definition =
            ToolDefinition::new(self.name.clone(), self.description.clone(), self.config.clone());
        match &self.id {
            Some(id) => definition.with_id(id.clone()),
            None => definition,
        }
    }
}

/// One `[agents.<agent_id>]` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Model the agent runs on (feeds the cache heuristic)
    pub model_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolrun_domain::McpProtocol;

    #[test]
    fn test_tool_entries_deserialize() {
        let toml_str = r#"
[[tools]]
name = "lookup"
description = "Look up a term"
type = "standalone"
url = "https://tools.example.com/lookup"
api_key = "secret"

[[tools]]
id = "def-report"
name = "report"
type = "workflow"
s3_url = "s3://flows/report.py"

[[tools]]
name = "search"
type = "mcp"
entrypoint = "https://mcp.example.com"
protocol = "sse"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tools.len(), 3);

        let lookup = config.tools[0].to_definition();
        assert_eq!(lookup.description, "Look up a term");
        assert_eq!(lookup.config.family(), "standalone");

        let report = config.tools[1].to_definition();
        assert_eq!(report.id, "def-report");
        assert_eq!(report.description, "");

        assert!(matches!(
            config.tools[2].config,
            ToolConfig::Mcp { protocol: McpProtocol::Sse, .. }
        ));
    }

    #[test]
    fn test_id_derived_from_name() {
        let entry = FileToolEntry {
            id: None,
            name: "lookup".to_string(),
            description: String::new(),
            config: ToolConfig::Internal { params: None },
        };
        assert_eq!(entry.to_definition().id, ToolDefinition::internal("lookup", "").id);
    }

    #[test]
    fn test_agents_deserialize() {
        let toml_str = r#"
[agents.agent-1]
model_id = "claude-3-5-sonnet-20240620"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.agents["agent-1"].model_id.as_deref(),
            Some("claude-3-5-sonnet-20240620")
        );
    }
}
