//! Executor adapters, one per execution family

pub mod mcp;
pub mod standalone;
pub mod workflow;

pub use mcp::UnsupportedMcpExecutor;
pub use standalone::{HttpStandaloneExecutor, StandaloneSettings};
pub use workflow::BusWorkflowExecutor;
