//! HTTP executor for standalone tools
//!
//! Each request is POSTed as JSON to the tool's endpoint on its own task.
//! The terminal outcome, success or failure, is reported back through the
//! completion sink; `submit` itself never waits on the network.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use toolrun_application::{CompletionSink, PublishError, ToolExecutorPort};
use toolrun_domain::{Completion, ResultKind, StandaloneRequest, ToolRunId, ToolRunRepository};
use tracing::{debug, info, warn};

/// Retry and timeout settings for tool endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandaloneSettings {
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Total attempts per request (at least one is always made)
    pub retries: u32,
    /// Pause between attempts
    pub retry_delay: Duration,
}

impl Default for StandaloneSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            retries: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// [`ToolExecutorPort`] for HTTP-backed tools.
pub struct HttpStandaloneExecutor {
    client: reqwest::Client,
    settings: StandaloneSettings,
    completions: Arc<dyn CompletionSink>,
    runs: Option<Arc<dyn ToolRunRepository>>,
}

impl HttpStandaloneExecutor {
    pub fn new(
        settings: StandaloneSettings,
        completions: Arc<dyn CompletionSink>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            settings,
            completions,
            runs: None,
        })
    }

    /// Mark runs `Running` when their request goes out.
    pub fn with_run_tracking(mut self, runs: Arc<dyn ToolRunRepository>) -> Self {
        self.runs = Some(runs);
        self
    }
}

#[async_trait]
impl ToolExecutorPort<StandaloneRequest> for HttpStandaloneExecutor {
    fn family(&self) -> &'static str {
        "standalone"
    }

    async fn submit(&self, requests: Vec<StandaloneRequest>) -> Result<(), PublishError> {
        for request in requests {
            let client = self.client.clone();
            let settings = self.settings.clone();
            let completions = Arc::clone(&self.completions);
            let runs = self.runs.clone();

            tokio::spawn(async move {
                if let Some(runs) = runs
                    && let Err(e) = runs.mark_running(&request.tool_run_id).await
                {
                    warn!(tool_run_id = %request.tool_run_id, error = %e, "Failed to mark run as running");
                }

                let completion = call_tool(&client, &settings, &request).await;
                if let Err(e) = completions.complete(completion).await {
                    warn!(
                        tool_run_id = %request.tool_run_id,
                        error = %e,
                        "Dropped standalone tool completion"
                    );
                }
            });
        }
        Ok(())
    }
}

/// Call the endpoint, retrying transport errors and 5xx responses.
async fn call_tool(
    client: &reqwest::Client,
    settings: &StandaloneSettings,
    request: &StandaloneRequest,
) -> Completion {
    let attempts = settings.retries.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        info!(
            tool = %request.tool_name,
            tool_run_id = %request.tool_run_id,
            attempt,
            "Calling standalone tool"
        );

        let mut builder = client
            .post(&request.url)
            .header(ACCEPT, "application/json")
            .json(&request.input);
        if let Some(key) = &request.api_key {
            builder = builder.bearer_auth(key);
        }

        match builder.send().await {
            Ok(response) if response.status().is_server_error() => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                last_error = format!("HTTP error {}: {}", status, body);
            }
            Ok(response) => return completion_from(request.tool_run_id.clone(), response).await,
            Err(e) => last_error = format!("Request failed: {}", e),
        }

        if attempt < attempts {
            warn!(
                tool = %request.tool_name,
                attempt,
                error = %last_error,
                "Standalone tool call failed, retrying"
            );
            tokio::time::sleep(settings.retry_delay).await;
        }
    }

    Completion::error(
        request.tool_run_id.clone(),
        format!("Failed after {} attempts: {}", attempts, last_error),
    )
}

async fn completion_from(id: ToolRunId, response: reqwest::Response) -> Completion {
    let status = response.status();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return Completion::error(id, format!("Failed to read response body: {}", e)),
    };

    if status.as_u16() >= 400 {
        let text = String::from_utf8_lossy(&body);
        return Completion::error(id, format!("HTTP error {}: {}", status.as_u16(), text));
    }

    match serde_json::from_slice::<Value>(&body) {
        Ok(content) => {
            debug!(tool_run_id = %id, bytes = body.len(), "Standalone tool succeeded");
            Completion::success(id, content, ResultKind::Text)
        }
        Err(e) => Completion::error(id, format!("Invalid JSON response: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::InProcessBus;
    use crate::persistence::InMemoryToolRunRepository;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;
    use toolrun_application::InboundMessage;
    use toolrun_domain::{NewToolRun, RunContext, ToolDefinition, ToolRunStatus};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fast_settings() -> StandaloneSettings {
        StandaloneSettings {
            timeout: Duration::from_secs(5),
            retries: 3,
            retry_delay: Duration::from_millis(10),
        }
    }

    fn request(id: &str, url: String) -> StandaloneRequest {
        StandaloneRequest {
            tool_run_id: ToolRunId::new(id),
            tool_name: "lookup".to_string(),
            input: json!({"q": "rust"}),
            url,
            api_key: None,
        }
    }

    async fn next_completion(receiver: &mut mpsc::Receiver<InboundMessage>) -> Completion {
        match tokio::time::timeout(Duration::from_secs(10), receiver.recv())
            .await
            .unwrap()
            .unwrap()
        {
            InboundMessage::Completion(c) => c,
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_returns_parsed_json() {
        let base = serve(Router::new().route(
            "/lookup",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"text": format!("found {}", body["q"].as_str().unwrap_or(""))}))
            }),
        ))
        .await;

        let (bus, mut receiver) = InProcessBus::new(8);
        let executor = HttpStandaloneExecutor::new(fast_settings(), Arc::new(bus)).unwrap();
        executor
            .submit(vec![request("r1", format!("{}/lookup", base))])
            .await
            .unwrap();

        let completion = next_completion(&mut receiver).await;
        assert_eq!(completion.tool_run_id.as_str(), "r1");
        assert!(!completion.is_error);
        assert_eq!(completion.result_kind, ResultKind::Text);
        assert_eq!(completion.content, json!({"text": "found rust"}));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/lookup",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::BAD_REQUEST, "missing q")
                }),
            )
            .with_state(Arc::clone(&hits));
        let base = serve(app).await;

        let (bus, mut receiver) = InProcessBus::new(8);
        let executor = HttpStandaloneExecutor::new(fast_settings(), Arc::new(bus)).unwrap();
        executor
            .submit(vec![request("r1", format!("{}/lookup", base))])
            .await
            .unwrap();

        let completion = next_completion(&mut receiver).await;
        assert!(completion.is_error);
        assert_eq!(completion.content, json!({"error": "HTTP error 400: missing q"}));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_retries_then_fails() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/lookup",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::SERVICE_UNAVAILABLE, "down")
                }),
            )
            .with_state(Arc::clone(&hits));
        let base = serve(app).await;

        let (bus, mut receiver) = InProcessBus::new(8);
        let executor = HttpStandaloneExecutor::new(fast_settings(), Arc::new(bus)).unwrap();
        executor
            .submit(vec![request("r1", format!("{}/lookup", base))])
            .await
            .unwrap();

        let completion = next_completion(&mut receiver).await;
        assert!(completion.is_error);
        let message = completion.content["error"].as_str().unwrap();
        assert!(message.contains("Failed after 3 attempts"));
        assert!(message.contains("HTTP error 503"));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_server_error_then_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/lookup",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})))
                    } else {
                        (StatusCode::OK, Json(json!({"text": "recovered"})))
                    }
                }),
            )
            .with_state(Arc::clone(&hits));
        let base = serve(app).await;

        let (bus, mut receiver) = InProcessBus::new(8);
        let executor = HttpStandaloneExecutor::new(fast_settings(), Arc::new(bus)).unwrap();
        executor
            .submit(vec![request("r1", format!("{}/lookup", base))])
            .await
            .unwrap();

        let completion = next_completion(&mut receiver).await;
        assert!(!completion.is_error);
        assert_eq!(completion.content, json!({"text": "recovered"}));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_json_body_is_error() {
        let base = serve(Router::new().route("/lookup", post(|| async { "plain text" }))).await;

        let (bus, mut receiver) = InProcessBus::new(8);
        let executor = HttpStandaloneExecutor::new(fast_settings(), Arc::new(bus)).unwrap();
        executor
            .submit(vec![request("r1", format!("{}/lookup", base))])
            .await
            .unwrap();

        let completion = next_completion(&mut receiver).await;
        assert!(completion.is_error);
        assert!(
            completion.content["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid JSON response")
        );
    }

    #[tokio::test]
    async fn test_api_key_sent_as_bearer() {
        let base = serve(Router::new().route(
            "/lookup",
            post(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Json(json!({"text": auth}))
            }),
        ))
        .await;

        let (bus, mut receiver) = InProcessBus::new(8);
        let executor = HttpStandaloneExecutor::new(fast_settings(), Arc::new(bus)).unwrap();
        let mut req = request("r1", format!("{}/lookup", base));
        req.api_key = Some("secret".to_string());
        executor.submit(vec![req]).await.unwrap();

        let completion = next_completion(&mut receiver).await;
        assert_eq!(completion.content, json!({"text": "Bearer secret"}));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_failure() {
        let (bus, mut receiver) = InProcessBus::new(8);
        let settings = StandaloneSettings {
            retries: 2,
            ..fast_settings()
        };
        let executor = HttpStandaloneExecutor::new(settings, Arc::new(bus)).unwrap();
        // Port 9 (discard) is closed on test hosts.
        executor
            .submit(vec![request("r1", "http://127.0.0.1:9/lookup".to_string())])
            .await
            .unwrap();

        let completion = next_completion(&mut receiver).await;
        assert!(completion.is_error);
        assert!(
            completion.content["error"]
                .as_str()
                .unwrap()
                .contains("Request failed")
        );
    }

    #[tokio::test]
    async fn test_run_tracking_marks_running() {
        let base = serve(Router::new().route(
            "/lookup",
            post(|| async { Json(json!({"text": "ok"})) }),
        ))
        .await;

        let repo = Arc::new(InMemoryToolRunRepository::new());
        let run = repo
            .create(NewToolRun::for_tool(
                "run-1",
                &ToolDefinition::standalone("lookup", base.clone()),
                json!({}),
                RunContext::new("t", "a", "u"),
            ))
            .await
            .unwrap();

        let (bus, mut receiver) = InProcessBus::new(8);
        let executor = HttpStandaloneExecutor::new(fast_settings(), Arc::new(bus))
            .unwrap()
            .with_run_tracking(repo.clone());
        let req = request("run-1", format!("{}/lookup", base));
        executor.submit(vec![req]).await.unwrap();

        next_completion(&mut receiver).await;
        let row = repo.get(&run.id).await.unwrap().unwrap();
        assert_eq!(row.status, ToolRunStatus::Running);
    }
}
