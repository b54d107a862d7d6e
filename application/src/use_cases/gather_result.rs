//! Gather Result use case (fan-in)
//!
//! Handles the completion of a single run:
//!
//! 1. Record the terminal outcome on the row (conditional on it not being
//!    terminal already).
//! 2. Without a parent, emit one block for the run.
//! 3. With a parent, re-read the sibling set. Only when every child is
//!    terminal does the caller that wins the parent transition aggregate.
//! 4. A completed `batch_tool` nested under another parent bubbles up
//!    instead of emitting, so the outermost parent aggregates the subtree.
//!
//! The parent transition is a conditional update, so redelivered or racing
//! completions emit at most once per parent. Every read aggregation needs
//! happens before that transition; a redelivered completion that finds a
//! nested parent already completed keeps walking up.
//!
//! Aggregation shape depends on the parent:
//!
//! | Parent | Result |
//! |--------|--------|
//! | fan-out parent | one block per child |
//! | `batch_tool` | one block keyed by the batch id, children's content flattened |

use super::error::EngineError;
use crate::config::EngineConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::event_publisher::EventPublisher;
use crate::ports::tool_catalog::AgentDirectory;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::json;
use std::sync::Arc;
use toolrun_domain::{
    AggregatedResult, Completion, ContentPiece, FinishResult, ResultBlock, RunContext, ToolRun,
    ToolRunId, ToolRunRepository, shape_run,
};
use tracing::{debug, info, warn};

/// What a completion led to.
#[derive(Debug, Clone, PartialEq)]
pub enum GatherOutcome {
    /// A result was handed to the conversation loop.
    Emitted(AggregatedResult),
    /// Recorded; the parent is still waiting on siblings.
    SiblingsPending { parent_run_id: ToolRunId },
    /// The run (or its parent) is gone or was finalized by another completion.
    AlreadyFinalized,
    /// A top-level run was already terminal; nothing was emitted.
    Duplicate,
}

/// Use case for fan-in of tool run completions
pub struct GatherResultUseCase {
    repository: Arc<dyn ToolRunRepository>,
    agents: Arc<dyn AgentDirectory>,
    publisher: Arc<dyn EventPublisher>,
    logger: Arc<dyn ConversationLogger>,
    config: EngineConfig,
}

impl GatherResultUseCase {
    pub fn new(
        repository: Arc<dyn ToolRunRepository>,
        agents: Arc<dyn AgentDirectory>,
        publisher: Arc<dyn EventPublisher>,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self {
            repository,
            agents,
            publisher,
            logger,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn execute(&self, completion: Completion) -> Result<GatherOutcome, EngineError> {
        let run = match self
            .repository
            .finish(&completion.tool_run_id, completion.outcome())
            .await?
        {
            FinishResult::Finished(run) => run,
            FinishResult::AlreadyTerminal(run) => {
                info!(
                    tool_run_id = %run.id,
                    status = run.status.as_str(),
                    "Tool run already terminal, ignoring duplicate result"
                );
                // Re-check the parent: an earlier delivery may have stopped
                // between the row update and the parent transition
                return match run.parent_run_id {
                    Some(parent_run_id) => self.fan_in(parent_run_id).await,
                    None => Ok(GatherOutcome::Duplicate),
                };
            }
            FinishResult::NotFound => {
                info!(
                    tool_run_id = %completion.tool_run_id,
                    "No tool run found, might be finished"
                );
                return Ok(GatherOutcome::AlreadyFinalized);
            }
        };

        info!(
            tool_run_id = %run.id,
            status = run.status.as_str(),
            duration_ms = run.duration.map(|d| d.as_millis() as u64),
            "Updated tool run status"
        );
        self.logger.log(ConversationEvent::new(
            "tool_result",
            json!({
                "tool_run_id": run.id,
                "tool_name": run.tool_name,
                "status": run.status,
                "result_kind": completion.result_kind,
            }),
        ));

        match run.parent_run_id.clone() {
            None => {
                // A completion always finishes a leaf; no further reads
                // stand between the row update and the emission
                let model_id = self.agents.model_id(&run.context.agent_id);
                let block = self.leaf_block(&run, model_id.as_deref());
                self.emit(&run.context, vec![block]).await
            }
            Some(parent_run_id) => self.fan_in(parent_run_id).await,
        }
    }

    /// Walk up from a parent whose child just finished.
    ///
    /// The outermost parent's blocks are built before its one-time
    /// transition, so a storage failure while reading them leaves the parent
    /// open for the redelivered completion.
    async fn fan_in(&self, mut parent_run_id: ToolRunId) -> Result<GatherOutcome, EngineError> {
        loop {
            if !self.repository.all_children_terminal(&parent_run_id).await? {
                debug!(
                    parent_run_id = %parent_run_id,
                    "Not all child tool runs have completed, waiting"
                );
                return Ok(GatherOutcome::SiblingsPending { parent_run_id });
            }

            let Some(parent) = self.repository.get(&parent_run_id).await? else {
                info!(parent_run_id = %parent_run_id, "Parent tool run missing");
                return Ok(GatherOutcome::AlreadyFinalized);
            };

            let Some(grandparent) = parent.parent_run_id.clone() else {
                return self.finalize(parent).await;
            };

            // None: an earlier delivery completed it before stopping further up
            if self.repository.complete_parent(&parent.id).await?.is_some() {
                info!(
                    parent_run_id = %parent.id,
                    tool_name = %parent.tool_name,
                    "All child tool runs completed, parent marked SUCCESS"
                );
            }
            debug!(
                tool_run_id = %parent.id,
                parent_run_id = %grandparent,
                "Nested parent completed, continuing fan-in"
            );
            parent_run_id = grandparent;
        }
    }

    /// Aggregate and emit for the outermost parent, once.
    async fn finalize(&self, parent: ToolRun) -> Result<GatherOutcome, EngineError> {
        if parent.is_terminal() {
            info!(parent_run_id = %parent.id, "Parent tool run already completed");
            return Ok(GatherOutcome::AlreadyFinalized);
        }

        let blocks = self.aggregate(&parent).await?;

        let Some(completed) = self.repository.complete_parent(&parent.id).await? else {
            info!(
                parent_run_id = %parent.id,
                "Parent tool run missing or already completed"
            );
            return Ok(GatherOutcome::AlreadyFinalized);
        };
        info!(
            parent_run_id = %completed.id,
            tool_name = %completed.tool_name,
            "All child tool runs completed, parent marked SUCCESS"
        );
        self.emit(&completed.context, blocks).await
    }

    async fn aggregate(&self, parent: &ToolRun) -> Result<Vec<ResultBlock>, EngineError> {
        let model_id = self.agents.model_id(&parent.context.agent_id);
        let model_id = model_id.as_deref();

        if parent.is_fan_out_parent() {
            let children = self.repository.children_of(&parent.id).await?;
            let mut blocks = Vec::with_capacity(children.len());
            for child in &children {
                blocks.push(self.subtree_block(child, model_id).await?);
            }
            info!(
                parent_run_id = %parent.id,
                child_count = children.len(),
                "Aggregated parallel tool results"
            );
            Ok(blocks)
        } else {
            let block = self.subtree_block(parent, model_id).await?;
            info!(
                batch_id = %parent.id,
                total_content_blocks = block.content.len(),
                "Created batch_tool result"
            );
            Ok(vec![block])
        }
    }

    /// The block a run contributes: its own result for a leaf, its flattened
    /// subtree for a container.
    async fn subtree_block(
        &self,
        run: &ToolRun,
        model_id: Option<&str>,
    ) -> Result<ResultBlock, EngineError> {
        let children = self.repository.children_of(&run.id).await?;
        if children.is_empty() {
            return Ok(self.leaf_block(run, model_id));
        }

        let mut content = Vec::new();
        for child in &children {
            content.extend(self.flattened_content(child).await?);
        }
        // Individual children may have failed; the container itself did not
        let block = ResultBlock::new(run.id.clone(), content, false);
        let cache = self.config.cache.should_cache(&block.content, model_id);
        Ok(block.cached(cache))
    }

    fn leaf_block(&self, run: &ToolRun, model_id: Option<&str>) -> ResultBlock {
        let shaped = shape_run(run);
        let block = ResultBlock::new(run.id.clone(), shaped.content, shaped.is_error);
        let cache = self.config.cache.should_cache(&block.content, model_id);
        block.cached(cache)
    }

    fn flattened_content<'a>(
        &'a self,
        run: &'a ToolRun,
    ) -> BoxFuture<'a, Result<Vec<ContentPiece>, EngineError>> {
        async move {
            let children = self.repository.children_of(&run.id).await?;
            if children.is_empty() {
                if !run.is_terminal() {
                    warn!(
                        child_id = %run.id,
                        status = run.status.as_str(),
                        "Skipping incomplete child tool"
                    );
                    return Ok(Vec::new());
                }
                return Ok(shape_run(run).content);
            }

            let mut content = Vec::new();
            for child in &children {
                content.extend(self.flattened_content(child).await?);
            }
            Ok(content)
        }
        .boxed()
    }

    async fn emit(
        &self,
        context: &RunContext,
        blocks: Vec<ResultBlock>,
    ) -> Result<GatherOutcome, EngineError> {
        let result = AggregatedResult::new(context, blocks);

        self.logger.log(ConversationEvent::new(
            "aggregated_result",
            json!({
                "agent_id": result.agent_id,
                "thread_id": result.thread_id,
                "tool_use_ids": result.block_ids(),
                "cached": result.result_blocks.iter().filter(|b| b.is_cached()).count(),
            }),
        ));

        self.publisher.publish_result(result.clone()).await?;
        info!(
            agent_id = %result.agent_id,
            thread_id = %result.thread_id,
            blocks = result.result_blocks.len(),
            "Published aggregated result"
        );
        Ok(GatherOutcome::Emitted(result))
    }
}
