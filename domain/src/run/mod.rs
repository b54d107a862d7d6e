//! Tool run domain — the persisted run tree.
//!
//! Every tool invocation attempt is one [`ToolRun`](entities::ToolRun) row.
//! Rows link to their parent through `parent_run_id`; the tree exists only as
//! these rows, never as an in-memory structure. Fan-in decisions are derived
//! by re-reading rows through [`ToolRunRepository`](repository::ToolRunRepository).
//!
//! ```text
//! fan-out parent (synthetic, N > 1 tool uses in one turn)
//!   ├─ run "a"  (lookup)
//!   └─ run "b"  (batch_tool)
//!        ├─ run <uuid> (x)
//!        └─ run <uuid> (y)
//! ```
//!
//! # State Transitions
//!
//! ```text
//! Pending ──> Running ──> Success
//!    │                └──> Failed
//!    └──────────────────> Success / Failed
//! ```
//!
//! Terminal transitions are conditional: a run that is already terminal is
//! never overwritten, which makes duplicate completions harmless.

pub mod entities;
pub mod repository;

pub use entities::{NewToolRun, RunContext, RunOutcome, ToolRun, ToolRunId, ToolRunStatus};
pub use repository::{FinishResult, RepositoryError, ToolRunRepository};
