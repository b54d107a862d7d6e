//! Dispatch domain — what the engine sends out and what comes back.
//!
//! Outbound: [`DispatchPlan`] (per-family requests), [`HandoffEvent`],
//! [`AggregatedResult`]. Inbound: [`Completion`].

pub mod events;
pub mod plan;

pub use events::{AggregatedResult, Completion, HandoffEvent};
pub use plan::{
    DispatchPlan, McpRequest, StandaloneRequest, WORKFLOW_ENGINE, WorkflowRequest,
    workflow_run_id,
};
