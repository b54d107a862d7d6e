//! JSON output formatter

use crate::output::formatter::OutputFormatter;
use serde::Serialize;
use serde_json::json;
use toolrun_domain::{AggregatedResult, HandoffEvent, ToolDefinition, WorkflowRequest};

/// Pretty-printed JSON, one document per call
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, result: &AggregatedResult) -> String {
        Self::render(&json!({"event": "aggregated_result", "payload": result}))
    }

    fn format_handoff(&self, event: &HandoffEvent) -> String {
        Self::render(&json!({"event": "handoff", "payload": event}))
    }

    fn format_workflow_request(&self, request: &WorkflowRequest) -> String {
        Self::render(&json!({"event": "workflow_request", "payload": request}))
    }

    fn format_catalog(&self, tools: &[ToolDefinition], issues: &[String]) -> String {
        Self::render(&json!({"tools": tools, "issues": issues}))
    }
}
