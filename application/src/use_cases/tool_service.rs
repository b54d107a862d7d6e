//! Tool service message loop
//!
//! Consumes [`InboundMessage`]s and handles each one in its own task, so
//! turns and completions are processed concurrently with no lock over the
//! run tree. A handler that fails with a retryable error is redelivered
//! after a delay, up to a limit.
//!
//! Cancellation stops intake; handlers already running are awaited.

use super::dispatch_turn::DispatchTurnUseCase;
use super::error::EngineError;
use super::gather_result::GatherResultUseCase;
use crate::config::ServiceParams;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use toolrun_domain::{Completion, DispatchTrigger};
use tracing::{debug, error, info, warn};

/// Messages the engine consumes
#[derive(Debug, Clone)]
pub enum InboundMessage {
    Dispatch(DispatchTrigger),
    Completion(Completion),
}

impl InboundMessage {
    fn kind(&self) -> &'static str {
        match self {
            InboundMessage::Dispatch(_) => "dispatch",
            InboundMessage::Completion(_) => "completion",
        }
    }
}

/// Hosts the engine: one task per inbound message
pub struct ToolService {
    dispatch: Arc<DispatchTurnUseCase>,
    gather: Arc<GatherResultUseCase>,
    params: ServiceParams,
}

impl ToolService {
    pub fn new(dispatch: DispatchTurnUseCase, gather: GatherResultUseCase) -> Self {
        Self {
            dispatch: Arc::new(dispatch),
            gather: Arc::new(gather),
            params: ServiceParams::default(),
        }
    }

    pub fn with_params(mut self, params: ServiceParams) -> Self {
        self.params = params;
        self
    }

    /// Handle one message once.
    pub async fn handle(&self, message: InboundMessage) -> Result<(), EngineError> {
        handle_message(&self.dispatch, &self.gather, message).await
    }

    /// Run until `inbound` closes or `cancellation` fires.
    pub async fn run(
        &self,
        mut inbound: mpsc::Receiver<InboundMessage>,
        cancellation: CancellationToken,
    ) {
        info!("Tool service started");
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    info!("Cancellation requested, stopping message intake");
                    break;
                }

                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Message handler panicked: {}", e);
                    }
                }

                message = inbound.recv() => {
                    let Some(message) = message else {
                        debug!("Inbound channel closed");
                        break;
                    };
                    let dispatch = Arc::clone(&self.dispatch);
                    let gather = Arc::clone(&self.gather);
                    let params = self.params.clone();
                    tasks.spawn(async move {
                        handle_with_redelivery(&dispatch, &gather, message, &params).await;
                    });
                }
            }
        }

        let in_flight = tasks.len();
        if in_flight > 0 {
            info!(in_flight, "Waiting for in-flight handlers");
        }
        while let Some(res) = tasks.join_next().await {
            if let Err(e) = res {
                error!("Message handler panicked: {}", e);
            }
        }
        info!("Tool service stopped");
    }
}

async fn handle_message(
    dispatch: &DispatchTurnUseCase,
    gather: &GatherResultUseCase,
    message: InboundMessage,
) -> Result<(), EngineError> {
    match message {
        InboundMessage::Dispatch(trigger) => {
            dispatch.execute(&trigger).await?;
        }
        InboundMessage::Completion(completion) => {
            gather.execute(completion).await?;
        }
    }
    Ok(())
}

async fn handle_with_redelivery(
    dispatch: &DispatchTurnUseCase,
    gather: &GatherResultUseCase,
    message: InboundMessage,
    params: &ServiceParams,
) {
    let mut attempt = 0u32;
    loop {
        match handle_message(dispatch, gather, message.clone()).await {
            Ok(()) => return,
            Err(e) if e.is_retryable() && attempt < params.max_redeliveries => {
                attempt += 1;
                warn!(
                    kind = message.kind(),
                    attempt,
                    error = %e,
                    "Message handling failed, redelivering"
                );
                tokio::time::sleep(params.redelivery_delay).await;
            }
            Err(e) => {
                error!(
                    kind = message.kind(),
                    attempts = attempt + 1,
                    error = %e,
                    "Message handling failed, dropping message"
                );
                return;
            }
        }
    }
}
