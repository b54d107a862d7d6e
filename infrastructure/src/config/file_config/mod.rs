//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod engine;
mod logging;
mod standalone;
mod tools;

pub use engine::{FileEngineConfig, FileServiceConfig};
pub use logging::FileLoggingConfig;
pub use standalone::FileStandaloneConfig;
pub use tools::{FileAgentConfig, FileToolEntry};

use crate::catalog::{CatalogBuilder, CatalogError, StaticAgentDirectory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use toolrun_domain::{ToolCatalog, ToolDefinition};

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("tools[{index}]: name cannot be empty")]
    EmptyToolName { index: usize },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("agents.{0}: model_id cannot be empty")]
    EmptyModelId(String),

    #[error("standalone.timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("standalone.retries cannot be 0")]
    InvalidRetries,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Fan-in settings
    pub engine: FileEngineConfig,
    /// Message loop settings
    pub service: FileServiceConfig,
    /// HTTP tool endpoint settings
    pub standalone: FileStandaloneConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
    /// Tool catalog entries
    pub tools: Vec<FileToolEntry>,
    /// Agents by id
    pub agents: BTreeMap<String, FileAgentConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        for (index, tool) in self.tools.iter().enumerate() {
            if tool.name.trim().is_empty() {
                issues.push(ConfigValidationError::EmptyToolName { index });
            }
        }
        issues.extend(
            CatalogBuilder::new()
                .tools(self.tool_definitions())
                .check()
                .into_iter()
                .map(ConfigValidationError::from),
        );

        for (agent_id, agent) in &self.agents {
            if agent.model_id.as_deref().is_some_and(|m| m.trim().is_empty()) {
                issues.push(ConfigValidationError::EmptyModelId(agent_id.clone()));
            }
        }

        if self.standalone.timeout_secs == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if self.standalone.retries == 0 {
            issues.push(ConfigValidationError::InvalidRetries);
        }

        issues
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(FileToolEntry::to_definition).collect()
    }

    /// Configured tools plus the control tools.
    pub fn build_catalog(&self) -> Result<ToolCatalog, CatalogError> {
        CatalogBuilder::new().tools(self.tool_definitions()).build()
    }

    /// Agents with a configured model.
    pub fn agent_directory(&self) -> StaticAgentDirectory {
        self.agents
            .iter()
            .filter_map(|(id, agent)| agent.model_id.clone().map(|model| (id.clone(), model)))
            .collect()
    }
}
