//! Routing of a resolved tool to the way the engine handles it.
//!
//! Control tools are recognised by name first, then everything else is
//! classified by its configured execution family:
//!
//! | Route | Trigger | Engine behaviour |
//! |-------|---------|------------------|
//! | `Batch` | name `batch_tool` | expand children recursively, never dispatched |
//! | `Handoff` | name `invoke_agent` | emit a hand-off event, never dispatched |
//! | `Standalone` | standalone config | HTTP executor |
//! | `Workflow` | workflow config | workflow process supervisor |
//! | `Mcp` | mcp config | MCP executor (stub) |
//! | `Unroutable` | any other internal tool | no executor exists |

use super::entities::{BATCH_TOOL, INVOKE_AGENT, ToolConfig, ToolDefinition};

/// How the engine handles one resolved tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRoute<'a> {
    Batch,
    Handoff,
    Standalone {
        url: &'a str,
        api_key: Option<&'a str>,
    },
    Workflow {
        s3_url: &'a str,
    },
    Mcp,
    Unroutable,
}

impl<'a> ToolRoute<'a> {
    pub fn of(tool: &'a ToolDefinition) -> Self {
        match tool.name.as_str() {
            BATCH_TOOL => return ToolRoute::Batch,
            INVOKE_AGENT => return ToolRoute::Handoff,
            _ => {}
        }

        match &tool.config {
            ToolConfig::Standalone { url, api_key, .. } => ToolRoute::Standalone {
                url,
                api_key: api_key.as_deref(),
            },
            ToolConfig::Workflow { s3_url, .. } => ToolRoute::Workflow { s3_url },
            ToolConfig::Mcp { .. } => ToolRoute::Mcp,
            ToolConfig::Internal { .. } => ToolRoute::Unroutable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::McpProtocol;

    #[test]
    fn test_control_tools_route_by_name() {
        let batch = ToolDefinition::internal(BATCH_TOOL, "");
        let handoff = ToolDefinition::internal(INVOKE_AGENT, "");
        assert_eq!(ToolRoute::of(&batch), ToolRoute::Batch);
        assert_eq!(ToolRoute::of(&handoff), ToolRoute::Handoff);
    }

    #[test]
    fn test_name_wins_over_family() {
        // A misconfigured control tool is still treated as a control tool
        let batch = ToolDefinition::standalone(BATCH_TOOL, "http://localhost/batch");
        assert_eq!(ToolRoute::of(&batch), ToolRoute::Batch);
    }

    #[test]
    fn test_family_routes() {
        let mut standalone = ToolDefinition::standalone("lookup", "http://localhost/lookup");
        if let ToolConfig::Standalone { api_key, .. } = &mut standalone.config {
            *api_key = Some("k".to_string());
        }
        assert_eq!(
            ToolRoute::of(&standalone),
            ToolRoute::Standalone {
                url: "http://localhost/lookup",
                api_key: Some("k"),
            }
        );

        let workflow = ToolDefinition::workflow("report", "s3://bucket/report.py");
        assert_eq!(
            ToolRoute::of(&workflow),
            ToolRoute::Workflow {
                s3_url: "s3://bucket/report.py"
            }
        );

        let mcp = ToolDefinition::new(
            "search",
            "",
            ToolConfig::Mcp {
                entrypoint: "https://mcp.example.com".to_string(),
                protocol: McpProtocol::Sse,
                env_vars: None,
                api_key: None,
            },
        );
        assert_eq!(ToolRoute::of(&mcp), ToolRoute::Mcp);
    }

    #[test]
    fn test_other_internal_tool_is_unroutable() {
        let internal = ToolDefinition::internal("noop", "");
        assert_eq!(ToolRoute::of(&internal), ToolRoute::Unroutable);
    }
}
