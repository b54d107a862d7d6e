//! Tool domain module
//!
//! Defines the **Tool Catalog** side of the engine: what a tool is, which
//! execution family runs it, and how the engine routes it.
//!
//! ```text
//! ┌──────────────┐   resolve by name   ┌────────────────┐   ToolRoute::of   ┌──────────────┐
//! │ tool use     │────────────────────▶│ ToolDefinition │──────────────────▶│ ToolRoute    │
//! │ {id,name,..} │                     │ (catalog)      │                   │ (sum type)   │
//! └──────────────┘                     └────────────────┘                   └──────────────┘
//! ```
//!
//! # Execution Families
//!
//! | Family | Configuration | Executor |
//! |--------|---------------|----------|
//! | **Standalone** | HTTP endpoint, optional API key | HTTP POST |
//! | **Workflow** | `s3://` code location | process supervisor |
//! | **MCP** | entrypoint + protocol | not implemented (stub) |
//! | **Internal** | none | the engine itself (`batch_tool`, `invoke_agent`) |
//!
//! # Key Types
//!
//! - [`ToolDefinition`] — catalog entry
//! - [`ToolCatalog`] — name-indexed set of definitions
//! - [`ToolRoute`] — exhaustive routing decision for a resolved tool
//! - [`batch::parse_invocations`] — tolerant parsing of `batch_tool` input

pub mod batch;
pub mod entities;
pub mod route;
pub mod value_objects;

pub use batch::{BatchInvocation, parse_invocations};
pub use entities::{
    BATCH_TOOL, FAN_OUT_PARENT, INVOKE_AGENT, McpProtocol, ToolCatalog, ToolConfig, ToolDefinition,
};
pub use route::ToolRoute;
pub use value_objects::{BatchInputError, ToolConfigError};
