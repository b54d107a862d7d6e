//! Port for messages addressed to the conversation loop.

use super::tool_executor::PublishError;
use async_trait::async_trait;
use toolrun_domain::{AggregatedResult, HandoffEvent};

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand an aggregated result back to the conversation loop.
    async fn publish_result(&self, result: AggregatedResult) -> Result<(), PublishError>;

    /// Start a conversation with another agent.
    async fn publish_handoff(&self, event: HandoffEvent) -> Result<(), PublishError>;
}
