//! CLI entrypoint for toolrun
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use toolrun_application::{
    CompletionSink, ConversationLogger, DecomposeTurnUseCase, DispatchRouter, DispatchTurnUseCase,
    EventPublisher, GatherResultUseCase, NoConversationLogger, ToolService,
};
use toolrun_domain::{DispatchTrigger, ToolRunRepository};
use toolrun_infrastructure::{
    BusWorkflowExecutor, ConfigLoader, FileConfig, HttpStandaloneExecutor, InMemoryToolRunRepository,
    InProcessBus, JsonlConversationLogger, OutboundEvent, UnsupportedMcpExecutor,
};
use toolrun_presentation::{Cli, Command, ConsoleFormatter, JsonFormatter, OutputFormat, OutputFormatter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.command == Command::Config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let formatter: Box<dyn OutputFormatter> = match cli.output {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };

    match cli.command {
        Command::Run { turn, timeout_secs } => {
            run_turn(&config, &turn, Duration::from_secs(timeout_secs), formatter.as_ref()).await
        }
        Command::Catalog => {
            let issues: Vec<String> = config.validate().iter().map(|i| i.to_string()).collect();
            let tools = match config.build_catalog() {
                Ok(catalog) => {
                    let mut all: Vec<_> = catalog.all().cloned().collect();
                    all.sort_by(|a, b| a.name.cmp(&b.name));
                    all
                }
                Err(_) => config.tool_definitions(),
            };
            println!("{}", formatter.format_catalog(&tools, &issues));
            Ok(())
        }
        Command::Config => Ok(()),
    }
}

async fn run_turn(
    config: &FileConfig,
    turn: &Path,
    timeout: Duration,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let raw = std::fs::read_to_string(turn)
        .with_context(|| format!("Failed to read turn file {}", turn.display()))?;
    let trigger: DispatchTrigger = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid dispatch trigger in {}", turn.display()))?;

    for issue in config.validate() {
        warn!("Configuration issue: {}", issue);
    }
    let catalog = Arc::new(config.build_catalog()?);
    let agents = Arc::new(config.agent_directory());
    let params = config.service.to_service_params();

    // === Dependency Injection ===
    let (bus, inbound) = InProcessBus::new(params.channel_capacity);
    let mut events = bus.subscribe();

    let repository: Arc<dyn ToolRunRepository> = Arc::new(InMemoryToolRunRepository::new());
    let completions: Arc<dyn CompletionSink> = Arc::new(bus.clone());
    let publisher: Arc<dyn EventPublisher> = Arc::new(bus.clone());
    let logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
        Some(path) => match JsonlConversationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    let standalone = HttpStandaloneExecutor::new(config.standalone.to_settings(), completions.clone())
        .context("Failed to build HTTP client")?
        .with_run_tracking(repository.clone());
    let router = DispatchRouter::new(
        Arc::new(standalone),
        Arc::new(BusWorkflowExecutor::new(bus.clone())),
        Arc::new(UnsupportedMcpExecutor::new(completions.clone())),
        completions,
    );
    let decompose =
        DecomposeTurnUseCase::new(repository.clone(), catalog, publisher.clone(), logger.clone());
    let dispatch = DispatchTurnUseCase::new(decompose, router, logger.clone());
    let gather = GatherResultUseCase::new(repository, agents, publisher, logger)
        .with_config(config.engine.to_engine_config());
    let service = ToolService::new(dispatch, gather).with_params(params);

    let cancellation = CancellationToken::new();
    let service_task = {
        let cancellation = cancellation.clone();
        tokio::spawn(async move { service.run(inbound, cancellation).await })
    };

    info!(thread_id = ?trigger.thread_id, agent_id = %trigger.agent_id, "Submitting turn");
    bus.send_dispatch(trigger).await?;

    let waited = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(OutboundEvent::AggregatedResult(result)) => {
                    println!("{}", formatter.format_result(&result));
                    return true;
                }
                Ok(OutboundEvent::Handoff(event)) => println!("{}", formatter.format_handoff(&event)),
                Ok(OutboundEvent::WorkflowRequest(request)) => {
                    println!("{}", formatter.format_workflow_request(&request))
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Missed outbound events"),
                Err(RecvError::Closed) => return false,
            }
        }
    })
    .await;

    cancellation.cancel();
    if let Err(e) = service_task.await {
        warn!(error = %e, "Tool service task failed");
    }

    match waited {
        Ok(true) => Ok(()),
        Ok(false) => Err(anyhow!("Event bus closed before a result was gathered")),
        Err(_) => Err(anyhow!(
            "No gathered result within {} seconds",
            timeout.as_secs()
        )),
    }
}
