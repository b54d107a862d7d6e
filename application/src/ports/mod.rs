//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod event_publisher;
pub mod tool_catalog;
pub mod tool_executor;
