//! Agent directory from configured agents

use std::collections::HashMap;
use toolrun_application::AgentDirectory;

/// Fixed map from agent id to model id.
#[derive(Debug, Clone, Default)]
pub struct StaticAgentDirectory {
    models: HashMap<String, String>,
}

impl StaticAgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        self.models.insert(agent_id.into(), model_id.into());
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl FromIterator<(String, String)> for StaticAgentDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            models: iter.into_iter().collect(),
        }
    }
}

impl AgentDirectory for StaticAgentDirectory {
    fn model_id(&self, agent_id: &str) -> Option<String> {
        self.models.get(agent_id).cloned()
    }
}
