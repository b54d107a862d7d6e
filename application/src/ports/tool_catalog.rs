//! Tool catalog and agent directory ports
//!
//! Both are read-only lookups from the engine's point of view.

use toolrun_domain::{ToolCatalog, ToolDefinition};

/// Lookup from tool name to catalog entry.
pub trait ToolCatalogPort: Send + Sync {
    /// Resolve a tool by the name the model used.
    fn resolve(&self, name: &str) -> Option<ToolDefinition>;

    /// Every entry, sorted by name.
    fn definitions(&self) -> Vec<ToolDefinition>;
}

impl ToolCatalogPort for ToolCatalog {
    fn resolve(&self, name: &str) -> Option<ToolDefinition> {
        self.get(name).cloned()
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        let mut all: Vec<_> = self.all().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

/// Lookup from agent id to the model the agent is configured with.
///
/// Feeds the cache annotation heuristic; an unknown agent means no caching.
pub trait AgentDirectory: Send + Sync {
    fn model_id(&self, agent_id: &str) -> Option<String>;
}

/// Directory that knows no agents.
pub struct NoAgentDirectory;

impl AgentDirectory for NoAgentDirectory {
    fn model_id(&self, _agent_id: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_port_resolves_by_name() {
        let catalog = ToolCatalog::with_control_tools()
            .register(ToolDefinition::standalone("lookup", "http://localhost/lookup"));

        assert_eq!(catalog.resolve("lookup").unwrap().name, "lookup");
        assert!(catalog.resolve("missing").is_none());

        let names: Vec<_> = catalog.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["batch_tool", "invoke_agent", "lookup"]);
    }

    #[test]
    fn test_no_agent_directory() {
        assert_eq!(NoAgentDirectory.model_id("agent-1"), None);
    }
}
