//! Presentation layer for toolrun
//!
//! This crate contains CLI definitions and output formatters for
//! aggregated results, hand-offs and the tool catalog.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use output::json::JsonFormatter;
