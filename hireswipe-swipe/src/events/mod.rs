pub mod publisher;

use hireswipe_shared::clients::rabbitmq::RabbitMQClient;
use hireswipe_shared::types::Event;

#[derive(Debug, thiserror::Error)]
#[error("event publish failed: {0}")]
pub struct EventError(String);

/// Destination for domain events published after a swipe commits.
#[axum::async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(
        &self,
        routing_key: &str,
        event: &Event<serde_json::Value>,
    ) -> Result<(), EventError>;

    fn is_connected(&self) -> bool {
        true
    }
}

#[axum::async_trait]
impl EventSink for RabbitMQClient {
    async fn publish(
        &self,
        routing_key: &str,
        event: &Event<serde_json::Value>,
    ) -> Result<(), EventError> {
        RabbitMQClient::publish(self, routing_key, event)
            .await
            .map_err(|e| EventError(e.to_string()))
    }

    fn is_connected(&self) -> bool {
        RabbitMQClient::is_connected(self)
    }
}
