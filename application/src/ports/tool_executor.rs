//! Tool Executor port
//!
//! The engine never waits on tool execution. Requests leave through one
//! [`ToolExecutorPort`] per execution family; results come back later as
//! [`Completion`]s through a [`CompletionSink`].

use async_trait::async_trait;
use thiserror::Error;
use toolrun_domain::Completion;

/// Failure to hand a message to the transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Channel closed")]
    Closed,

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Port for one execution family
///
/// This port defines how the application layer hands requests to executors.
/// Implementations (adapters) live in the infrastructure layer.
/// `submit` returns once the requests are handed off.
#[async_trait]
pub trait ToolExecutorPort<R: Send + 'static>: Send + Sync {
    /// Family name for logs (e.g., "standalone")
    fn family(&self) -> &'static str;

    async fn submit(&self, requests: Vec<R>) -> Result<(), PublishError>;
}

/// Inbound path for the terminal result of a single run.
#[async_trait]
pub trait CompletionSink: Send + Sync {
    async fn complete(&self, completion: Completion) -> Result<(), PublishError>;
}
