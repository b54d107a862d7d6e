//! Output formatter trait

use toolrun_domain::{AggregatedResult, HandoffEvent, ToolDefinition, WorkflowRequest};

/// Trait for rendering engine events and the catalog
pub trait OutputFormatter {
    /// Gathered result for a turn
    fn format_result(&self, result: &AggregatedResult) -> String;

    /// Conversation handed to another agent
    fn format_handoff(&self, event: &HandoffEvent) -> String;

    /// Request left for the workflow supervisor
    fn format_workflow_request(&self, request: &WorkflowRequest) -> String;

    /// Tool catalog with configuration issues
    fn format_catalog(&self, tools: &[ToolDefinition], issues: &[String]) -> String;
}
