//! Application layer for toolrun
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EngineConfig, ServiceParams};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    event_publisher::EventPublisher,
    tool_catalog::{AgentDirectory, NoAgentDirectory, ToolCatalogPort},
    tool_executor::{CompletionSink, PublishError, ToolExecutorPort},
};
pub use use_cases::decompose_turn::DecomposeTurnUseCase;
pub use use_cases::dispatch_router::{DispatchReport, DispatchRouter};
pub use use_cases::dispatch_turn::DispatchTurnUseCase;
pub use use_cases::error::EngineError;
pub use use_cases::gather_result::{GatherOutcome, GatherResultUseCase};
pub use use_cases::tool_service::{InboundMessage, ToolService};
