//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for engine events
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    Text,
    /// One JSON document per event
    Json,
}

/// CLI arguments for toolrun
#[derive(Parser, Debug)]
#[command(name = "toolrun")]
#[command(author, version, about = "Fan tool calls out to their executors and gather the results")]
#[command(long_about = r#"
toolrun takes an assistant turn that requests tools, dispatches every tool use
to its executor (HTTP endpoint, workflow supervisor, MCP server), and gathers
the results into a single message for the conversation.

Configuration files are loaded from (in priority order):
1. TOOLRUN_* environment variables
2. --config <path>     Explicit config file
3. ./toolrun.toml      Project-level config
4. ~/.config/toolrun/config.toml   Global config

Example:
  toolrun run --turn turn.json
  toolrun --output json run --turn turn.json --timeout-secs 120
  toolrun catalog
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Dispatch the tool uses of a turn and print the gathered result
    Run {
        /// JSON file holding the dispatch trigger
        #[arg(long, value_name = "FILE")]
        turn: PathBuf,

        /// Give up waiting for the gathered result after this many seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// List the configured tools and configuration issues
    Catalog,
    /// Show configuration file locations
    Config,
}
