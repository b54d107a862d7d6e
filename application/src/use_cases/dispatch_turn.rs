//! Dispatch Turn use case
//!
//! Decomposes a model turn, then hands the resulting plan to the router.
//! Completes once every family has accepted its requests.

use super::decompose_turn::DecomposeTurnUseCase;
use super::dispatch_router::{DispatchReport, DispatchRouter};
use super::error::EngineError;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::json;
use std::sync::Arc;
use toolrun_domain::DispatchTrigger;

/// Use case for handling a dispatch trigger end to end
pub struct DispatchTurnUseCase {
    decompose: DecomposeTurnUseCase,
    router: DispatchRouter,
    logger: Arc<dyn ConversationLogger>,
}

impl DispatchTurnUseCase {
    pub fn new(
        decompose: DecomposeTurnUseCase,
        router: DispatchRouter,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self {
            decompose,
            router,
            logger,
        }
    }

    pub async fn execute(&self, trigger: &DispatchTrigger) -> Result<DispatchReport, EngineError> {
        let plan = self.decompose.execute(trigger).await?;

        if !plan.is_empty() {
            self.logger.log(ConversationEvent::new(
                "tool_dispatch",
                json!({
                    "agent_id": trigger.agent_id,
                    "thread_id": trigger.thread_id,
                    "standalone": plan.standalone.iter().map(|r| &r.tool_name).collect::<Vec<_>>(),
                    "workflow": plan.workflow.iter().map(|r| &r.tool_definition_id).collect::<Vec<_>>(),
                    "mcp": plan.mcp.iter().map(|r| &r.tool_name).collect::<Vec<_>>(),
                    "tool_run_ids": plan.dispatched_run_ids(),
                }),
            ));
        }

        Ok(self.router.route(plan).await)
    }
}
