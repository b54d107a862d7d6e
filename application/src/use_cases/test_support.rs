//! Hand-written test doubles for the use case tests.

use crate::ports::conversation_logger::NoConversationLogger;
use crate::ports::event_publisher::EventPublisher;
use crate::ports::tool_catalog::AgentDirectory;
use crate::ports::tool_executor::{CompletionSink, PublishError, ToolExecutorPort};
use crate::use_cases::decompose_turn::DecomposeTurnUseCase;
use crate::use_cases::dispatch_router::DispatchRouter;
use crate::use_cases::dispatch_turn::DispatchTurnUseCase;
use crate::use_cases::gather_result::GatherResultUseCase;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use toolrun_domain::{
    AggregatedResult, Completion, DispatchTrigger, FinishResult, HandoffEvent, McpRequest,
    ModelTurn, NewToolRun, RepositoryError, ResultKind, RunOutcome, StandaloneRequest, ToolCatalog,
    ToolDefinition, ToolRun, ToolRunId, ToolRunRepository, ToolUseRequest, TurnBlock,
    WorkflowRequest,
};

// ==================== Repository ====================

#[derive(Default)]
pub struct MemoryRepository {
    rows: Mutex<Vec<ToolRun>>,
    /// Number of upcoming `finish` calls that fail with a storage error
    pub failing_finishes: AtomicUsize,
    /// Id whose next `create` fails once with a storage error
    pub failing_create_of: Mutex<Option<String>>,
    /// Number of upcoming `children_of` calls that fail with a storage error
    pub failing_children_reads: AtomicUsize,
    /// Number of upcoming `all_children_terminal` calls that fail with a storage error
    pub failing_terminal_checks: AtomicUsize,
}

fn storage_failure(budget: &AtomicUsize) -> Result<(), RepositoryError> {
    match budget.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)) {
        Ok(_) => Err(RepositoryError::Storage("connection reset".to_string())),
        Err(_) => Ok(()),
    }
}

impl MemoryRepository {
    pub fn row(&self, id: &str) -> Option<ToolRun> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id.as_str() == id)
            .cloned()
    }

    pub fn rows(&self) -> Vec<ToolRun> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail_create_of(&self, id: &str) {
        *self.failing_create_of.lock().unwrap() = Some(id.to_string());
    }

    pub fn remove(&self, id: &str) {
        self.rows.lock().unwrap().retain(|r| r.id.as_str() != id);
    }
}

#[async_trait]
impl ToolRunRepository for MemoryRepository {
    async fn create(&self, run: NewToolRun) -> Result<ToolRun, RepositoryError> {
        {
            let mut failing = self.failing_create_of.lock().unwrap();
            if failing.as_deref() == Some(run.id.as_str()) {
                failing.take();
                return Err(RepositoryError::Storage("connection reset".to_string()));
            }
        }
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|r| r.id == run.id) {
            if existing.is_same_insert(&run) {
                return Ok(existing.clone());
            }
            return Err(RepositoryError::AlreadyExists(run.id.to_string()));
        }
        let seq = rows.len() as u64;
        let row = ToolRun::from_new(run, Utc::now(), seq);
        rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: &ToolRunId) -> Result<Option<ToolRun>, RepositoryError> {
        Ok(self.row(id.as_str()))
    }

    async fn mark_running(&self, id: &ToolRunId) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|r| &r.id == id)
            .is_some_and(|r| r.mark_running()))
    }

    async fn finish(
        &self,
        id: &ToolRunId,
        outcome: RunOutcome,
    ) -> Result<FinishResult, RepositoryError> {
        storage_failure(&self.failing_finishes)?;

        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| &r.id == id) else {
            return Ok(FinishResult::NotFound);
        };
        if row.finish(outcome, Utc::now()) {
            Ok(FinishResult::Finished(row.clone()))
        } else {
            Ok(FinishResult::AlreadyTerminal(row.clone()))
        }
    }

    async fn all_children_terminal(&self, parent: &ToolRunId) -> Result<bool, RepositoryError> {
        storage_failure(&self.failing_terminal_checks)?;
        let rows = self.rows.lock().unwrap();
        let mut children = rows
            .iter()
            .filter(|r| r.parent_run_id.as_ref() == Some(parent))
            .peekable();
        if children.peek().is_none() {
            return Ok(false);
        }
        Ok(children.all(|r| r.is_terminal()))
    }

    async fn children_of(&self, parent: &ToolRunId) -> Result<Vec<ToolRun>, RepositoryError> {
        storage_failure(&self.failing_children_reads)?;
        let rows = self.rows.lock().unwrap();
        let mut children: Vec<_> = rows
            .iter()
            .filter(|r| r.parent_run_id.as_ref() == Some(parent))
            .cloned()
            .collect();
        children.sort_by_key(|r| r.seq);
        Ok(children)
    }

    async fn complete_parent(&self, id: &ToolRunId) -> Result<Option<ToolRun>, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|r| &r.id == id)
            .and_then(|r| r.complete_as_parent(Utc::now()).then(|| r.clone())))
    }
}

// ==================== Outbound ====================

#[derive(Default)]
pub struct RecordingPublisher {
    pub results: Mutex<Vec<AggregatedResult>>,
    pub handoffs: Mutex<Vec<HandoffEvent>>,
}

impl RecordingPublisher {
    pub fn results(&self) -> Vec<AggregatedResult> {
        self.results.lock().unwrap().clone()
    }

    pub fn handoffs(&self) -> Vec<HandoffEvent> {
        self.handoffs.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_result(&self, result: AggregatedResult) -> Result<(), PublishError> {
        self.results.lock().unwrap().push(result);
        Ok(())
    }

    async fn publish_handoff(&self, event: HandoffEvent) -> Result<(), PublishError> {
        self.handoffs.lock().unwrap().push(event);
        Ok(())
    }
}

pub struct RecordingExecutor<R> {
    family: &'static str,
    pub submitted: Mutex<Vec<R>>,
    fail: bool,
}

impl<R> RecordingExecutor<R> {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            submitted: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing(family: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(family)
        }
    }
}

impl<R: Clone> RecordingExecutor<R> {
    pub fn submitted(&self) -> Vec<R> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl<R: Send + 'static> ToolExecutorPort<R> for RecordingExecutor<R> {
    fn family(&self) -> &'static str {
        self.family
    }

    async fn submit(&self, requests: Vec<R>) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Transport("broker unavailable".to_string()));
        }
        self.submitted.lock().unwrap().extend(requests);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub completions: Mutex<Vec<Completion>>,
}

impl RecordingSink {
    pub fn completions(&self) -> Vec<Completion> {
        self.completions.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionSink for RecordingSink {
    async fn complete(&self, completion: Completion) -> Result<(), PublishError> {
        self.completions.lock().unwrap().push(completion);
        Ok(())
    }
}

pub struct FixedAgents(pub HashMap<String, String>);

impl FixedAgents {
    pub fn with(agent_id: &str, model_id: &str) -> Self {
        Self(HashMap::from([(agent_id.to_string(), model_id.to_string())]))
    }
}

impl AgentDirectory for FixedAgents {
    fn model_id(&self, agent_id: &str) -> Option<String> {
        self.0.get(agent_id).cloned()
    }
}

// ==================== Harness ====================

pub const AGENT: &str = "agent-1";

pub fn catalog() -> ToolCatalog {
    ToolCatalog::with_control_tools()
        .register(ToolDefinition::standalone("lookup", "http://tools.local/lookup"))
        .register(ToolDefinition::standalone("x", "http://tools.local/x"))
        .register(ToolDefinition::standalone("y", "http://tools.local/y"))
        .register(ToolDefinition::workflow("report", "s3://flows/report.py"))
        .register(ToolDefinition::new(
            "mcp_search",
            "",
            toolrun_domain::ToolConfig::Mcp {
                entrypoint: "https://mcp.local".to_string(),
                protocol: toolrun_domain::McpProtocol::Sse,
                env_vars: None,
                api_key: None,
            },
        ))
        .register(ToolDefinition::internal("scratchpad", "no executor"))
}

pub fn tool_use(id: &str, name: &str, input: Value) -> ToolUseRequest {
    ToolUseRequest::new(id, name, input)
}

pub fn trigger(uses: Vec<ToolUseRequest>) -> DispatchTrigger {
    DispatchTrigger {
        agent_id: AGENT.to_string(),
        recipient_id: "user-1".to_string(),
        thread_id: Some("thread-1".to_string()),
        connection_id: Some("conn-1".to_string()),
        message: ModelTurn::assistant(uses.into_iter().map(TurnBlock::ToolUse).collect()),
    }
}

pub fn text_completion(id: &ToolRunId, text: &str) -> Completion {
    Completion::success(id.clone(), json!({ "text": text }), ResultKind::Text)
}

/// All collaborators wired together around one repository.
pub struct Harness {
    pub repository: Arc<MemoryRepository>,
    pub publisher: Arc<RecordingPublisher>,
    pub standalone: Arc<RecordingExecutor<StandaloneRequest>>,
    pub workflow: Arc<RecordingExecutor<WorkflowRequest>>,
    pub mcp: Arc<RecordingExecutor<McpRequest>>,
    pub sink: Arc<RecordingSink>,
    pub agents: Arc<FixedAgents>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MemoryRepository::default()),
            publisher: Arc::new(RecordingPublisher::default()),
            standalone: Arc::new(RecordingExecutor::new("standalone")),
            workflow: Arc::new(RecordingExecutor::new("workflow")),
            mcp: Arc::new(RecordingExecutor::new("mcp")),
            sink: Arc::new(RecordingSink::default()),
            agents: Arc::new(FixedAgents::with(AGENT, "claude-3-opus")),
        }
    }

    pub fn with_agents(mut self, agents: FixedAgents) -> Self {
        self.agents = Arc::new(agents);
        self
    }

    pub fn decompose(&self) -> DecomposeTurnUseCase {
        DecomposeTurnUseCase::new(
            self.repository.clone(),
            Arc::new(catalog()),
            self.publisher.clone(),
            Arc::new(NoConversationLogger),
        )
    }

    pub fn router(&self) -> DispatchRouter {
        DispatchRouter::new(
            self.standalone.clone(),
            self.workflow.clone(),
            self.mcp.clone(),
            self.sink.clone(),
        )
    }

    pub fn dispatch(&self) -> DispatchTurnUseCase {
        DispatchTurnUseCase::new(self.decompose(), self.router(), Arc::new(NoConversationLogger))
    }

    pub fn gather(&self) -> GatherResultUseCase {
        GatherResultUseCase::new(
            self.repository.clone(),
            self.agents.clone(),
            self.publisher.clone(),
            Arc::new(NoConversationLogger),
        )
    }
}
