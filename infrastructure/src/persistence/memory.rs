//! In-memory tool run repository.
//!
//! Rows live in a single `Mutex<HashMap>`; every operation takes the lock for
//! one row-scoped read or update, which gives read-after-write consistency
//! across tasks. Conditional updates (`finish`, `complete_parent`) are
//! checked and applied under the same lock.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use toolrun_domain::{
    FinishResult, NewToolRun, RepositoryError, RunOutcome, ToolRun, ToolRunId, ToolRunRepository,
};
use tracing::trace;

#[derive(Default)]
struct Rows {
    by_id: HashMap<ToolRunId, ToolRun>,
    next_seq: u64,
}

/// Process-local [`ToolRunRepository`].
#[derive(Default)]
pub struct InMemoryToolRunRepository {
    rows: Mutex<Rows>,
}

impl InMemoryToolRunRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Rows>, RepositoryError> {
        self.rows
            .lock()
            .map_err(|e| RepositoryError::Storage(format!("run store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl ToolRunRepository for InMemoryToolRunRepository {
    async fn create(&self, run: NewToolRun) -> Result<ToolRun, RepositoryError> {
        let mut rows = self.lock()?;
        if let Some(existing) = rows.by_id.get(&run.id) {
            if existing.is_same_insert(&run) {
                trace!(tool_run_id = %existing.id, "Tool run already stored");
                return Ok(existing.clone());
            }
            return Err(RepositoryError::AlreadyExists(run.id.to_string()));
        }

        let seq = rows.next_seq;
        rows.next_seq += 1;
        let row = ToolRun::from_new(run, Utc::now(), seq);
        trace!(tool_run_id = %row.id, seq, "Inserted tool run");
        rows.by_id.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn get(&self, id: &ToolRunId) -> Result<Option<ToolRun>, RepositoryError> {
        Ok(self.lock()?.by_id.get(id).cloned())
    }

    async fn mark_running(&self, id: &ToolRunId) -> Result<bool, RepositoryError> {
        let mut rows = self.lock()?;
        Ok(rows.by_id.get_mut(id).is_some_and(|row| row.mark_running()))
    }

    async fn finish(
        &self,
        id: &ToolRunId,
        outcome: RunOutcome,
    ) -> Result<FinishResult, RepositoryError> {
        let mut rows = self.lock()?;
        let Some(row) = rows.by_id.get_mut(id) else {
            return Ok(FinishResult::NotFound);
        };

        if row.finish(outcome, Utc::now()) {
            Ok(FinishResult::Finished(row.clone()))
        } else {
            Ok(FinishResult::AlreadyTerminal(row.clone()))
        }
    }

    async fn all_children_terminal(&self, parent: &ToolRunId) -> Result<bool, RepositoryError> {
        let rows = self.lock()?;
        let mut any = false;
        for row in rows.by_id.values() {
            if row.parent_run_id.as_ref() == Some(parent) {
                if !row.is_terminal() {
                    return Ok(false);
                }
                any = true;
            }
        }
        Ok(any)
    }

    async fn children_of(&self, parent: &ToolRunId) -> Result<Vec<ToolRun>, RepositoryError> {
        let rows = self.lock()?;
        let mut children: Vec<ToolRun> = rows
            .by_id
            .values()
            .filter(|row| row.parent_run_id.as_ref() == Some(parent))
            .cloned()
            .collect();
        children.sort_by_key(|row| row.seq);
        Ok(children)
    }

    async fn complete_parent(&self, id: &ToolRunId) -> Result<Option<ToolRun>, RepositoryError> {
        let mut rows = self.lock()?;
        let Some(row) = rows.by_id.get_mut(id) else {
            return Ok(None);
        };
        Ok(row.complete_as_parent(Utc::now()).then(|| row.clone()))
    }
}
