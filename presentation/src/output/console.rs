//! Console output formatter for engine events

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use toolrun_domain::{
    AggregatedResult, ContentPiece, HandoffEvent, ImageSource, ResultBlock, ToolConfig,
    ToolDefinition, WorkflowRequest,
};

/// Longest text shown per content piece before truncation
const PREVIEW_CHARS: usize = 2000;

/// Formats engine events for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_result(result: &AggregatedResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Tool Results"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}  {} {}  {} {}\n",
            "Thread:".cyan().bold(),
            result.thread_id,
            "Agent:".cyan().bold(),
            result.agent_id,
            "Recipient:".cyan().bold(),
            result.recipient_id
        ));

        for block in &result.result_blocks {
            output.push_str(&Self::block(block));
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_handoff(event: &HandoffEvent) -> String {
        let query = event
            .new_message
            .pointer("/content/0/text")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        format!(
            "{} {} {} {}\n  {}\n",
            "Hand-off:".magenta().bold(),
            event.from_agent_id,
            "->".dimmed(),
            event.to_agent_id.bold(),
            query
        )
    }

    pub fn format_workflow_request(request: &WorkflowRequest) -> String {
        format!(
            "{} {} {}\n",
            "Workflow requested:".blue().bold(),
            request.tool_definition_id,
            format!("(run {})", request.tool_run_id).dimmed()
        )
    }

    pub fn format_catalog(tools: &[ToolDefinition], issues: &[String]) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header(&format!("Tools ({})", tools.len())));

        for tool in tools {
            output.push_str(&format!(
                "  {:<20} {:<10} {}\n",
                tool.name.bold(),
                tool.config.family().dimmed(),
                Self::target(&tool.config)
            ));
            if !tool.description.is_empty() {
                output.push_str(&format!("  {:<20} {}\n", "", tool.description.dimmed()));
            }
        }

        if !issues.is_empty() {
            output.push_str(&Self::section_header("Issues"));
            for issue in issues {
                output.push_str(&format!("  {} {}\n", "!".yellow().bold(), issue));
            }
        }
        output
    }

    fn block(block: &ResultBlock) -> String {
        let mut title = format!("── {} ──", block.tool_use_id);
        if block.is_cached() {
            title.push_str(" [cached]");
        }
        let title = if block.is_error {
            title.red().bold()
        } else {
            title.yellow().bold()
        };

        let mut output = format!("\n{}\n", title);
        for piece in &block.content {
            match piece {
                ContentPiece::Text { text, citations } => {
                    output.push_str(&Self::indent(&Self::truncate(text), "  "));
                    output.push('\n');
                    if !citations.is_empty() {
                        output.push_str(&format!(
                            "  {}\n",
                            format!("{} citation(s)", citations.len()).dimmed()
                        ));
                    }
                }
                ContentPiece::Image { source } => {
                    let description = match source {
                        ImageSource::Base64 { media_type, data } => {
                            format!("[image {} ({} bytes base64)]", media_type, data.len())
                        }
                        ImageSource::Url { url } => format!("[image {}]", url),
                    };
                    output.push_str(&format!("  {}\n", description.dimmed()));
                }
            }
        }
        output
    }

    fn target(config: &ToolConfig) -> String {
        match config {
            ToolConfig::Standalone { url, .. } => url.clone(),
            ToolConfig::Workflow { s3_url, .. } => s3_url.clone(),
            ToolConfig::Mcp {
                entrypoint,
                protocol,
                ..
            } => format!("{} ({})", entrypoint, protocol),
            ToolConfig::Internal { .. } => "built-in".to_string(),
        }
    }

    fn truncate(text: &str) -> String {
        match text.char_indices().nth(PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}… ({} bytes total)", &text[..cut], text.len()),
            None => text.to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_result(&self, result: &AggregatedResult) -> String {
        Self::format_result(result)
    }

    fn format_handoff(&self, event: &HandoffEvent) -> String {
        Self::format_handoff(event)
    }

    fn format_workflow_request(&self, request: &WorkflowRequest) -> String {
        Self::format_workflow_request(request)
    }

    fn format_catalog(&self, tools: &[ToolDefinition], issues: &[String]) -> String {
        Self::format_catalog(tools, issues)
    }
}
