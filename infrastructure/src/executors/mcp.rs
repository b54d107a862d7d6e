//! MCP executor
//!
//! MCP servers are accepted in the catalog but cannot be called yet. Each
//! request is answered with an error completion so the run tree still
//! reaches fan-in.

use async_trait::async_trait;
use std::sync::Arc;
use toolrun_application::{CompletionSink, PublishError, ToolExecutorPort};
use toolrun_domain::{Completion, McpRequest};
use tracing::warn;

pub const MCP_UNSUPPORTED: &str = "MCP tool execution is not supported";

pub struct UnsupportedMcpExecutor {
    completions: Arc<dyn CompletionSink>,
}

impl UnsupportedMcpExecutor {
    pub fn new(completions: Arc<dyn CompletionSink>) -> Self {
        Self { completions }
    }
}

#[async_trait]
impl ToolExecutorPort<McpRequest> for UnsupportedMcpExecutor {
    fn family(&self) -> &'static str {
        "mcp"
    }

    async fn submit(&self, requests: Vec<McpRequest>) -> Result<(), PublishError> {
        for request in requests {
            warn!(tool = %request.tool_name, tool_run_id = %request.tool_run_id, "{}", MCP_UNSUPPORTED);
            self.completions
                .complete(Completion::error(request.tool_run_id, MCP_UNSUPPORTED))
                .await?;
        }
        Ok(())
    }
}
