//! Decompose Turn use case
//!
//! Turns one model turn into persisted run rows and a [`DispatchPlan`].
//!
//! Rows are always written before the plan that references them is
//! returned, so no completion can arrive for a run that does not exist yet.
//! Expansion is sequential within a turn.
//!
//! Every id in the tree is either the provider's tool use id or derived from
//! its position, so decomposing the same turn again after a failed row write
//! finds the rows already written and only dispatches runs still pending.

use super::error::EngineError;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::event_publisher::EventPublisher;
use crate::ports::tool_catalog::ToolCatalogPort;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};
use std::sync::Arc;
use toolrun_domain::{
    Completion, DispatchPlan, DispatchTrigger, HandoffEvent, McpRequest, NewToolRun,
    StandaloneRequest, ToolDefinition, ToolRoute, ToolRun, ToolRunRepository, ToolRunStatus,
    WorkflowRequest, parse_invocations,
};
use tracing::{debug, error, info, warn};

/// Use case for decomposing a model turn into a run tree
pub struct DecomposeTurnUseCase {
    repository: Arc<dyn ToolRunRepository>,
    catalog: Arc<dyn ToolCatalogPort>,
    publisher: Arc<dyn EventPublisher>,
    logger: Arc<dyn ConversationLogger>,
}

impl DecomposeTurnUseCase {
    pub fn new(
        repository: Arc<dyn ToolRunRepository>,
        catalog: Arc<dyn ToolCatalogPort>,
        publisher: Arc<dyn EventPublisher>,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self {
            repository,
            catalog,
            publisher,
            logger,
        }
    }

    /// Create the run tree for `trigger` and collect its dispatchable leaves.
    pub async fn execute(&self, trigger: &DispatchTrigger) -> Result<DispatchPlan, EngineError> {
        let requests = trigger.message.requested_tools()?;
        let context = trigger.context()?;

        // Resolve first; a catalog miss drops the entry before any row exists
        let mut resolved = Vec::with_capacity(requests.len());
        for request in &requests {
            let Some(tool) = self.catalog.resolve(&request.name) else {
                warn!(
                    tool_name = %request.name,
                    tool_use_id = %request.id,
                    agent_id = %context.agent_id,
                    "Tool not found in catalog, skipping"
                );
                continue;
            };
            if !request.input.is_object() {
                warn!(
                    tool_name = %request.name,
                    tool_use_id = %request.id,
                    "Tool input is not an object, skipping"
                );
                continue;
            }
            resolved.push((*request, tool));
        }

        if resolved.is_empty() {
            warn!(
                thread_id = %context.thread_id,
                requested = requests.len(),
                "No tool use request could be resolved"
            );
            return Ok(DispatchPlan::new());
        }

        let parent_run_id = if requests.len() > 1 {
            let parent = self
                .repository
                .create(NewToolRun::fan_out_parent(
                    requests.iter().map(|r| r.id.as_str()),
                    context.clone(),
                ))
                .await?;
            debug!(
                parent_run_id = %parent.id,
                children = resolved.len(),
                "Created fan-out parent"
            );
            Some(parent.id)
        } else {
            None
        };

        let mut plan = DispatchPlan::new();
        for (request, tool) in resolved {
            let run = self
                .repository
                .create(
                    NewToolRun::for_tool(
                        request.id.as_str(),
                        &tool,
                        request.input.clone(),
                        context.clone(),
                    )
                    .with_parent(parent_run_id.clone()),
                )
                .await?;
            plan.merge(self.expand(run, tool).await?);
        }

        info!(
            thread_id = %context.thread_id,
            standalone = plan.standalone.len(),
            workflow = plan.workflow.len(),
            mcp = plan.mcp.len(),
            immediate_failures = plan.immediate_failures.len(),
            "Decomposed model turn"
        );

        Ok(plan)
    }

    /// Expand one created run by its route. Recurses through `batch_tool`.
    fn expand(&self, run: ToolRun, tool: ToolDefinition) -> BoxFuture<'_, Result<DispatchPlan, EngineError>> {
        async move {
            let mut plan = DispatchPlan::new();

            // Left over from an earlier attempt at this turn
            if run.status != ToolRunStatus::Pending {
                debug!(
                    tool_run_id = %run.id,
                    status = run.status.as_str(),
                    "Tool run already past pending, not dispatching again"
                );
                return Ok(plan);
            }

            match ToolRoute::of(&tool) {
                ToolRoute::Batch => {
                    plan.merge(self.expand_batch(&run).await?);
                }
                ToolRoute::Handoff => {
                    if let Some(failure) = self.hand_off(&run).await {
                        plan.immediate_failures.push(failure);
                    }
                }
                ToolRoute::Standalone { url, api_key } => {
                    plan.standalone.push(StandaloneRequest {
                        tool_run_id: run.id,
                        tool_name: tool.name.clone(),
                        input: run.input,
                        url: url.to_string(),
                        api_key: api_key.map(str::to_string),
                    });
                }
                ToolRoute::Workflow { s3_url } => {
                    debug!(tool_run_id = %run.id, s3_url, "Queued workflow tool");
                    plan.workflow
                        .push(WorkflowRequest::new(run.id, tool.id.as_str(), run.input));
                }
                ToolRoute::Mcp => {
                    plan.mcp.push(McpRequest {
                        tool_run_id: run.id,
                        tool_name: tool.name.clone(),
                        input: run.input,
                    });
                }
                ToolRoute::Unroutable => {
                    error!(
                        tool_run_id = %run.id,
                        tool_name = %tool.name,
                        family = tool.config.family(),
                        "Tool has no executor"
                    );
                    plan.immediate_failures.push(Completion::error(
                        run.id,
                        format!("Tool '{}' has no executor", tool.name),
                    ));
                }
            }

            Ok(plan)
        }
        .boxed()
    }

    async fn expand_batch(&self, run: &ToolRun) -> Result<DispatchPlan, EngineError> {
        let mut plan = DispatchPlan::new();

        let invocations = match parse_invocations(&run.input) {
            Ok(invocations) => invocations,
            Err(e) => {
                error!(tool_run_id = %run.id, error = %e, "Malformed batch_tool input");
                plan.immediate_failures.push(Completion::error(
                    run.id.clone(),
                    format!("Invalid batch_tool input: {}", e),
                ));
                return Ok(plan);
            }
        };

        let mut created = 0usize;
        for (index, invocation) in invocations.into_iter().enumerate() {
            let invocation = match invocation {
                Ok(invocation) => invocation,
                Err(e) => {
                    error!(tool_run_id = %run.id, error = %e, "Skipping batch_tool invocation");
                    continue;
                }
            };

            let Some(tool) = self.catalog.resolve(&invocation.name) else {
                warn!(
                    tool_run_id = %run.id,
                    tool_name = %invocation.name,
                    "Batch child tool not found in catalog, skipping"
                );
                continue;
            };

            let child = self
                .repository
                .create(
                    NewToolRun::for_tool(
                        run.id.child(index),
                        &tool,
                        Value::Object(invocation.arguments),
                        run.context.clone(),
                    )
                    .with_parent(Some(run.id.clone())),
                )
                .await?;
            created += 1;
            plan.merge(self.expand(child, tool).await?);
        }

        if created == 0 {
            // A batch with no child rows would never fan in
            warn!(tool_run_id = %run.id, "batch_tool produced no runnable invocation");
            plan.immediate_failures.push(Completion::error(
                run.id.clone(),
                "batch_tool contained no runnable invocation",
            ));
        } else {
            debug!(tool_run_id = %run.id, children = created, "Expanded batch_tool");
        }

        Ok(plan)
    }

    /// Publish the hand-off. The target agent's answer completes the run later;
    /// a run that cannot be handed off fails right away.
    async fn hand_off(&self, run: &ToolRun) -> Option<Completion> {
        let Some(event) = HandoffEvent::from_input(&run.context.agent_id, run.id.clone(), &run.input)
        else {
            error!(
                tool_run_id = %run.id,
                "invoke_agent input requires string 'query' and 'agent_id'"
            );
            return Some(Completion::error(
                run.id.clone(),
                "invoke_agent requires string 'query' and 'agent_id'",
            ));
        };

        self.logger.log(ConversationEvent::new(
            "tool_handoff",
            json!({
                "tool_run_id": run.id,
                "from_agent_id": event.from_agent_id,
                "to_agent_id": event.to_agent_id,
            }),
        ));

        let to_agent_id = event.to_agent_id.clone();
        match self.publisher.publish_handoff(event).await {
            Ok(()) => {
                info!(tool_run_id = %run.id, to_agent_id = %to_agent_id, "Handed off to agent");
                None
            }
            Err(e) => {
                error!(tool_run_id = %run.id, error = %e, "Failed to publish hand-off");
                Some(Completion::error(
                    run.id.clone(),
                    format!("Failed to hand off to agent '{}': {}", to_agent_id, e),
                ))
            }
        }
    }
}
