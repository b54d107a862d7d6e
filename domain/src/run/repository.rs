//! Tool run repository trait
//!
//! The repository is the only shared mutable resource of the engine. Every
//! mutation is row-scoped and keyed by id; fan-in consistency comes from
//! re-reading rows, never from cross-row transactions.

use super::entities::{NewToolRun, RunOutcome, ToolRun, ToolRunId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a [`ToolRunRepository`] implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Tool run not found: {0}")]
    NotFound(String),

    #[error("Tool run already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Outcome of recording a terminal result on a run.
#[derive(Debug, Clone)]
pub enum FinishResult {
    /// The run moved to a terminal state; carries the updated row.
    Finished(ToolRun),
    /// The run was already terminal; carries the unchanged row.
    AlreadyTerminal(ToolRun),
    /// No such run (cleaned up, or never created).
    NotFound,
}

/// Repository trait for tool runs.
///
/// Implementations must provide read-after-write consistency: a row written
/// by [`finish`](Self::finish) is visible to the next
/// [`all_children_terminal`](Self::all_children_terminal) call on any task.
#[async_trait]
pub trait ToolRunRepository: Send + Sync {
    /// Insert a new `Pending` row.
    ///
    /// Writing the same row again returns the stored row unchanged, so a
    /// redelivered turn resumes its tree. A different row under an existing
    /// id fails with `AlreadyExists`.
    async fn create(&self, run: NewToolRun) -> Result<ToolRun, RepositoryError>;

    /// Fetch a row by id.
    async fn get(&self, id: &ToolRunId) -> Result<Option<ToolRun>, RepositoryError>;

    /// Move a `Pending` row to `Running`. Returns whether the row changed.
    async fn mark_running(&self, id: &ToolRunId) -> Result<bool, RepositoryError>;

    /// Record an executor outcome, conditional on the row being non-terminal.
    async fn finish(
        &self,
        id: &ToolRunId,
        outcome: RunOutcome,
    ) -> Result<FinishResult, RepositoryError>;

    /// Whether every child of `parent` is terminal.
    ///
    /// Returns `false` when the parent has no children.
    async fn all_children_terminal(&self, parent: &ToolRunId) -> Result<bool, RepositoryError>;

    /// Children of `parent` in creation order.
    async fn children_of(&self, parent: &ToolRunId) -> Result<Vec<ToolRun>, RepositoryError>;

    /// Mark a parent `Success`, conditional on it being non-terminal.
    ///
    /// Returns the updated row only to the single caller that performed the
    /// transition; every other caller gets `None`.
    async fn complete_parent(&self, id: &ToolRunId) -> Result<Option<ToolRun>, RepositoryError>;
}
