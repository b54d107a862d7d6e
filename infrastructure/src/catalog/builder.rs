//! Catalog assembly with validation

use thiserror::Error;
use toolrun_domain::{BATCH_TOOL, INVOKE_AGENT, ToolCatalog, ToolConfigError, ToolDefinition};
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Invalid configuration for tool '{name}': {source}")]
    InvalidTool {
        name: String,
        #[source]
        source: ToolConfigError,
    },
}

/// Collects tool definitions and produces a validated [`ToolCatalog`].
///
/// The control tools are added as internal tools unless configured
/// explicitly.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    tools: Vec<ToolDefinition>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: impl IntoIterator<Item = ToolDefinition>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Every problem with the collected definitions, in declaration order.
    pub fn check(&self) -> Vec<CatalogError> {
        let mut errors = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for tool in &self.tools {
            if !seen.insert(tool.name.as_str()) {
                errors.push(CatalogError::DuplicateTool(tool.name.clone()));
            }
            if let Err(source) = tool.config.validate() {
                errors.push(CatalogError::InvalidTool {
                    name: tool.name.clone(),
                    source,
                });
            }
        }
        errors
    }

    /// Build the catalog, failing on the first problem.
    pub fn build(self) -> Result<ToolCatalog, CatalogError> {
        if let Some(error) = self.check().into_iter().next() {
            return Err(error);
        }

        let mut catalog = ToolCatalog::new();
        for tool in self.tools {
            debug!(tool = %tool.name, family = tool.config.family(), "Registering tool");
            catalog = catalog.register(tool);
        }
        let defaults = ToolCatalog::with_control_tools();
        for name in [BATCH_TOOL, INVOKE_AGENT] {
            if let Some(tool) = defaults.get(name) {
                catalog = catalog.register_if_absent(tool.clone());
            }
        }
        Ok(catalog)
    }
}
