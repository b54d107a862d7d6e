//! Domain layer for toolrun
//!
//! This crate contains the core types of the tool fan-out/fan-in engine.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Run tree
//!
//! Every tool invocation attempt is a persisted [`ToolRun`] row linked to its
//! parent by id. A model turn with several tool uses gets a synthetic
//! fan-out parent; a `batch_tool` run is the parent of its invocations.
//! Completion of a subtree is derived by re-reading rows, never from memory.
//!
//! ## Routing
//!
//! A resolved [`ToolDefinition`] maps to exactly one [`ToolRoute`]: a control
//! tool (`batch_tool`, `invoke_agent`) or an execution family
//! (standalone, workflow, MCP).
//!
//! ## Fan-in shapes
//!
//! - **Fan-out parent**: one [`ResultBlock`] per child
//! - **Batch parent**: one flattened block keyed by the batch run id

pub mod core;
pub mod dispatch;
pub mod result;
pub mod run;
pub mod tool;
pub mod turn;

// Re-export commonly used types
pub use core::error::DomainError;
pub use dispatch::{
    AggregatedResult, Completion, DispatchPlan, HandoffEvent, McpRequest, StandaloneRequest,
    WorkflowRequest,
};
pub use result::{
    CacheControl, CachePolicy, ContentPiece, ImageSource, ResultBlock, ResultKind, ShapeError,
    ShapedContent, shape_content, shape_run,
};
pub use run::{
    FinishResult, NewToolRun, RepositoryError, RunContext, RunOutcome, ToolRun, ToolRunId,
    ToolRunRepository, ToolRunStatus,
};
pub use tool::{
    BATCH_TOOL, BatchInputError, BatchInvocation, FAN_OUT_PARENT, INVOKE_AGENT, McpProtocol,
    ToolCatalog, ToolConfig, ToolConfigError, ToolDefinition, ToolRoute, parse_invocations,
};
pub use turn::{DispatchTrigger, ModelTurn, ToolUseRequest, TurnBlock, TurnRole};
