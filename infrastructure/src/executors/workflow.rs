//! Workflow executor: hands requests to the process supervisor over the bus.

use crate::messaging::{InProcessBus, OutboundEvent};
use async_trait::async_trait;
use toolrun_application::{PublishError, ToolExecutorPort};
use toolrun_domain::WorkflowRequest;
use tracing::info;

pub struct BusWorkflowExecutor {
    bus: InProcessBus,
}

impl BusWorkflowExecutor {
    pub fn new(bus: InProcessBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl ToolExecutorPort<WorkflowRequest> for BusWorkflowExecutor {
    fn family(&self) -> &'static str {
        "workflow"
    }

    async fn submit(&self, requests: Vec<WorkflowRequest>) -> Result<(), PublishError> {
        for request in requests {
            info!(
                tool_run_id = %request.source_run_id,
                workflow_run_id = %request.tool_run_id,
                tool_definition_id = %request.tool_definition_id,
                "Publishing workflow request"
            );
            self.bus.publish(OutboundEvent::WorkflowRequest(request));
        }
        Ok(())
    }
}
