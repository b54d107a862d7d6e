//! Configuration file loading for toolrun
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLRUN_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolrun.toml` or `./.toolrun.toml`
//! 4. Global: `$XDG_CONFIG_HOME/toolrun/config.toml` (or `~/.config/toolrun/config.toml`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileConfig, FileEngineConfig, FileLoggingConfig,
    FileServiceConfig, FileStandaloneConfig, FileToolEntry,
};
pub use loader::ConfigLoader;
