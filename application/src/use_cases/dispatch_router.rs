//! Dispatch Router
//!
//! Hands each family list of a [`DispatchPlan`] to its executor. The three
//! submissions run concurrently and independently; the router only waits for
//! the hand-off, never for tool results.

use crate::ports::tool_executor::{CompletionSink, PublishError, ToolExecutorPort};
use std::sync::Arc;
use toolrun_domain::{
    Completion, DispatchPlan, McpRequest, StandaloneRequest, ToolRunId, WorkflowRequest,
};
use tracing::{debug, error};

/// What happened to one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Requests accepted by their executor
    pub submitted: usize,
    /// Runs reported back as failed without reaching an executor
    pub failed: usize,
}

/// Routes plan leaves to the execution families
pub struct DispatchRouter {
    standalone: Arc<dyn ToolExecutorPort<StandaloneRequest>>,
    workflow: Arc<dyn ToolExecutorPort<WorkflowRequest>>,
    mcp: Arc<dyn ToolExecutorPort<McpRequest>>,
    completions: Arc<dyn CompletionSink>,
}

impl DispatchRouter {
    pub fn new(
        standalone: Arc<dyn ToolExecutorPort<StandaloneRequest>>,
        workflow: Arc<dyn ToolExecutorPort<WorkflowRequest>>,
        mcp: Arc<dyn ToolExecutorPort<McpRequest>>,
        completions: Arc<dyn CompletionSink>,
    ) -> Self {
        Self {
            standalone,
            workflow,
            mcp,
            completions,
        }
    }

    pub async fn route(&self, plan: DispatchPlan) -> DispatchReport {
        let DispatchPlan {
            standalone,
            workflow,
            mcp,
            immediate_failures,
        } = plan;

        let standalone_ids: Vec<_> = standalone.iter().map(|r| r.tool_run_id.clone()).collect();
        let workflow_ids: Vec<_> = workflow.iter().map(|r| r.source_run_id.clone()).collect();
        let mcp_ids: Vec<_> = mcp.iter().map(|r| r.tool_run_id.clone()).collect();

        let (standalone_result, workflow_result, mcp_result) = tokio::join!(
            submit(self.standalone.as_ref(), standalone),
            submit(self.workflow.as_ref(), workflow),
            submit(self.mcp.as_ref(), mcp),
        );

        let mut report = DispatchReport::default();
        let mut failures = immediate_failures;
        for (ids, result, family) in [
            (standalone_ids, standalone_result, self.standalone.family()),
            (workflow_ids, workflow_result, self.workflow.family()),
            (mcp_ids, mcp_result, self.mcp.family()),
        ] {
            match result {
                Ok(()) => report.submitted += ids.len(),
                Err(e) => {
                    // Rows already exist; fail them so their parent can fan in
                    error!(family, count = ids.len(), error = %e, "Failed to submit requests");
                    failures.extend(ids.into_iter().map(|id| dispatch_failure(id, family, &e)));
                }
            }
        }

        for completion in failures {
            let tool_run_id = completion.tool_run_id.clone();
            match self.completions.complete(completion).await {
                Ok(()) => report.failed += 1,
                Err(e) => error!(tool_run_id = %tool_run_id, error = %e, "Failed to report dispatch failure"),
            }
        }

        debug!(
            submitted = report.submitted,
            failed = report.failed,
            "Dispatch handed off"
        );
        report
    }
}

async fn submit<R: Send + 'static>(
    executor: &dyn ToolExecutorPort<R>,
    requests: Vec<R>,
) -> Result<(), PublishError> {
    if requests.is_empty() {
        return Ok(());
    }
    executor.submit(requests).await
}

fn dispatch_failure(id: ToolRunId, family: &str, e: &PublishError) -> Completion {
    Completion::error(id, format!("Failed to dispatch to {} executor: {}", family, e))
}
