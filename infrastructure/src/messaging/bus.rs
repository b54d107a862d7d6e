//! In-process message bus

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use toolrun_application::{CompletionSink, EventPublisher, InboundMessage, PublishError};
use toolrun_domain::{AggregatedResult, Completion, DispatchTrigger, HandoffEvent, WorkflowRequest};
use tracing::{debug, warn};

/// Events leaving the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// For the conversation loop
    AggregatedResult(AggregatedResult),
    /// For the target agent's conversation loop
    Handoff(HandoffEvent),
    /// For the workflow process supervisor
    WorkflowRequest(WorkflowRequest),
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::AggregatedResult(_) => "aggregated_result",
            OutboundEvent::Handoff(_) => "handoff",
            OutboundEvent::WorkflowRequest(_) => "workflow_request",
        }
    }
}

/// Cloneable handle to both directions of the bus.
#[derive(Clone)]
pub struct InProcessBus {
    inbound: mpsc::Sender<InboundMessage>,
    outbound: broadcast::Sender<OutboundEvent>,
}

impl InProcessBus {
    /// Create the bus and the receiver the tool service consumes.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<InboundMessage>) {
        let capacity = capacity.max(1);
        let (inbound, receiver) = mpsc::channel(capacity);
        let (outbound, _) = broadcast::channel(capacity);
        (Self { inbound, outbound }, receiver)
    }

    /// Subscribe to outbound events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<OutboundEvent> {
        self.outbound.subscribe()
    }

    pub async fn send_dispatch(&self, trigger: DispatchTrigger) -> Result<(), PublishError> {
        self.send(InboundMessage::Dispatch(trigger)).await
    }

    pub async fn send(&self, message: InboundMessage) -> Result<(), PublishError> {
        self.inbound
            .send(message)
            .await
            .map_err(|_| PublishError::Closed)
    }

    /// Publish an outbound event.
    ///
    /// An event nobody listens to is dropped with a warning, like a broker
    /// subject without subscribers.
    pub fn publish(&self, event: OutboundEvent) {
        let name = event.name();
        match self.outbound.send(event) {
            Ok(receivers) => debug!(event = name, receivers, "Published outbound event"),
            Err(_) => warn!(event = name, "No subscriber for outbound event"),
        }
    }
}

#[async_trait]
impl CompletionSink for InProcessBus {
    async fn complete(&self, completion: Completion) -> Result<(), PublishError> {
        self.send(InboundMessage::Completion(completion)).await
    }
}

#[async_trait]
impl EventPublisher for InProcessBus {
    async fn publish_result(&self, result: AggregatedResult) -> Result<(), PublishError> {
        self.publish(OutboundEvent::AggregatedResult(result));
        Ok(())
    }

    async fn publish_handoff(&self, event: HandoffEvent) -> Result<(), PublishError> {
        self.publish(OutboundEvent::Handoff(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolrun_domain::{ResultKind, RunContext, ToolRunId};

    #[tokio::test]
    async fn test_completions_flow_inbound() {
        let (bus, mut receiver) = InProcessBus::new(4);
        bus.complete(Completion::success(
            ToolRunId::new("a"),
            json!({"text": "ok"}),
            ResultKind::Text,
        ))
        .await
        .unwrap();

        match receiver.recv().await.unwrap() {
            InboundMessage::Completion(c) => assert_eq!(c.tool_run_id.as_str(), "a"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped_is_closed() {
        let (bus, receiver) = InProcessBus::new(4);
        drop(receiver);
        let err = bus
            .complete(Completion::error(ToolRunId::new("a"), "x"))
            .await
            .unwrap_err();
        assert_eq!(err, PublishError::Closed);
    }

    #[tokio::test]
    async fn test_outbound_events_reach_every_subscriber() {
        let (bus, _receiver) = InProcessBus::new(4);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let result = AggregatedResult::new(&RunContext::new("t", "a", "u"), vec![]);
        bus.publish_result(result.clone()).await.unwrap();

        assert_eq!(first.recv().await.unwrap(), OutboundEvent::AggregatedResult(result.clone()));
        assert_eq!(second.recv().await.unwrap(), OutboundEvent::AggregatedResult(result));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_fail() {
        let (bus, _receiver) = InProcessBus::new(4);
        let event = HandoffEvent::from_input(
            "agent-1",
            ToolRunId::new("h"),
            &json!({"query": "q", "agent_id": "agent-2"}),
        )
        .unwrap();
        assert!(bus.publish_handoff(event).await.is_ok());
    }

    #[test]
    fn test_outbound_event_wire_shape() {
        let event = OutboundEvent::WorkflowRequest(WorkflowRequest::new(
            ToolRunId::new("w"),
            "def-1",
            json!({}),
        ));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "workflow_request");
        assert_eq!(value["payload"]["sourceRunId"], "w");
    }
}
