use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use serde::Serialize;

use crate::types::Event;

/// Topic exchange every HireSwipe service publishes domain events to.
pub const EXCHANGE_NAME: &str = "hireswipe.events";

const PERSISTENT: u8 = 2;

#[derive(Debug, thiserror::Error)]
pub enum RabbitMQError {
    #[error("amqp error: {0}")]
    Amqp(#[from] lapin::Error),
    #[error("event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("broker did not confirm delivery")]
    Nacked,
}

/// Publisher side of the event bus.
#[derive(Clone)]
pub struct RabbitMQClient {
    channel: Channel,
}

impl RabbitMQClient {
    pub async fn connect(url: &str) -> Result<Self, RabbitMQError> {
        let conn = Connection::connect(url, ConnectionProperties::default()).await?;
        let channel = conn.create_channel().await?;

        channel
            .exchange_declare(
                EXCHANGE_NAME,
                ExchangeKind::Topic,
                ExchangeDeclareOptions { durable: true, ..Default::default() },
                FieldTable::default(),
            )
            .await?;

        tracing::info!(exchange = EXCHANGE_NAME, "connected to RabbitMQ");
        Ok(Self { channel })
    }

    /// Publishes `event` as persistent JSON and waits for the broker's confirm.
    pub async fn publish<T: Serialize>(
        &self,
        routing_key: &str,
        event: &Event<T>,
    ) -> Result<(), RabbitMQError> {
        let payload = serde_json::to_vec(event)?;
        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_message_id(event.id.to_string().into())
            .with_delivery_mode(PERSISTENT);

        let confirm = self
            .channel
            .basic_publish(EXCHANGE_NAME, routing_key, BasicPublishOptions::default(), &payload, properties)
            .await?
            .await?;
        if confirm.is_nack() {
            return Err(RabbitMQError::Nacked);
        }

        tracing::debug!(routing_key, event_id = %event.id, "event published");
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.channel.status().connected()
    }
}
