//! Infrastructure layer for toolrun
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod catalog;
pub mod config;
pub mod executors;
pub mod logging;
pub mod messaging;
pub mod persistence;

// Re-export commonly used types
pub use catalog::{CatalogBuilder, CatalogError, StaticAgentDirectory};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileConfig, FileEngineConfig,
    FileLoggingConfig, FileServiceConfig, FileStandaloneConfig, FileToolEntry,
};
pub use executors::{
    BusWorkflowExecutor, HttpStandaloneExecutor, StandaloneSettings, UnsupportedMcpExecutor,
};
pub use logging::JsonlConversationLogger;
pub use messaging::{InProcessBus, OutboundEvent};
pub use persistence::InMemoryToolRunRepository;
