//! Redis Pub/Sub relay for chat messages.
//!
//! Every instance publishes the messages it persists to one Redis channel and
//! forwards whatever arrives on that channel to its local socket subscribers,
//! so a client connected to any instance sees messages saved on all of them.

use async_trait::async_trait;
use fred::clients::{Client, SubscriberClient};
use fred::error::{Error as RedisError, ErrorKind as RedisErrorKind};
use fred::interfaces::{ClientLike, EventInterface, PubsubInterface};
use fred::types::config::Config as RedisConfig;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tutorium_common::{AppError, AppResult};
use tutorium_core::services::{EventPublisher, MessageProjection, TopicEvent};

/// Redis-backed fan-out of topic events across server instances.
#[derive(Clone)]
pub struct RedisPubSub {
    publisher: Client,
    subscriber: SubscriberClient,
    channel: String,
    /// Events received from Redis are re-broadcast here.
    local_tx: broadcast::Sender<TopicEvent>,
}

impl RedisPubSub {
    /// Connect to Redis. Received events will be forwarded to `local_tx`.
    pub async fn new(
        redis_url: &str,
        channel: impl Into<String>,
        local_tx: broadcast::Sender<TopicEvent>,
    ) -> Result<Self, RedisError> {
        let config = RedisConfig::from_url(redis_url)?;

        let publisher = Client::new(config.clone(), None, None, None);
        publisher.init().await?;

        let subscriber = SubscriberClient::new(config, None, None, None);
        subscriber.init().await?;

        let channel = channel.into();
        info!(channel = %channel, "Redis Pub/Sub initialized");

        Ok(Self {
            publisher,
            subscriber,
            channel,
            local_tx,
        })
    }

    /// Subscribe to the message channel and start relaying into the local broadcast.
    pub async fn start(&self) -> Result<(), RedisError> {
        self.subscriber.subscribe(self.channel.as_str()).await?;
        info!(channel = %self.channel, "Subscribed to Redis Pub/Sub channel");

        let local_tx = self.local_tx.clone();
        let mut message_stream = self.subscriber.message_rx();

        tokio::spawn(async move {
            while let Ok(message) = message_stream.recv().await {
                let Some(payload) = message.value.as_string() else {
                    continue;
                };
                match decode_event(&payload) {
                    Ok(event) => {
                        debug!(topic = %event.topic, id = event.body.id, "Received Pub/Sub event");
                        if local_tx.send(event).is_err() {
                            debug!("No local subscribers for Pub/Sub event");
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse Pub/Sub message: {}", e);
                    }
                }
            }
            info!("Pub/Sub message stream ended");
        });

        Ok(())
    }

    /// Publish an event to the message channel.
    pub async fn publish(&self, event: &TopicEvent) -> Result<(), RedisError> {
        let payload = encode_event(event).map_err(|e| {
            RedisError::new(
                RedisErrorKind::InvalidArgument,
                format!("Serialization error: {e}"),
            )
        })?;
        let _: () = self
            .publisher
            .publish(self.channel.as_str(), payload)
            .await?;
        debug!(channel = %self.channel, topic = %event.topic, "Published Pub/Sub event");
        Ok(())
    }

    /// Get a receiver for events relayed from Redis.
    #[must_use]
    pub fn subscribe_local(&self) -> broadcast::Receiver<TopicEvent> {
        self.local_tx.subscribe()
    }

    /// Shutdown both Redis connections.
    pub async fn shutdown(&self) -> Result<(), RedisError> {
        self.subscriber.quit().await?;
        self.publisher.quit().await?;
        info!("Redis Pub/Sub shutdown");
        Ok(())
    }
}

/// The instance that saved a message learns about it through its own
/// subscription, the same way every other instance does.
#[async_trait]
impl EventPublisher for RedisPubSub {
    async fn publish_message(&self, topic: &str, message: &MessageProjection) -> AppResult<()> {
        let event = TopicEvent {
            topic: topic.to_string(),
            body: message.clone(),
        };
        self.publish(&event)
            .await
            .map_err(|e| AppError::Redis(e.to_string()))
    }
}

fn encode_event(event: &TopicEvent) -> serde_json::Result<String> {
    serde_json::to_string(event)
}

fn decode_event(payload: &str) -> serde_json::Result<TopicEvent> {
    serde_json::from_str(payload)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tutorium_core::services::MESSAGES_TOPIC;

    fn sample_event() -> TopicEvent {
        TopicEvent {
            topic: MESSAGES_TOPIC.to_string(),
            body: MessageProjection {
                id: 11,
                sender_id: 1,
                receiver_id: 2,
                chat_id: Some(4),
                body: "See you at five".to_string(),
                created_at: Utc.with_ymd_and_hms(2025, 3, 1, 17, 0, 0).unwrap(),
            },
        }
    }

    #[test]
    fn test_event_payload_shape() {
        let payload = encode_event(&sample_event()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["topic"], "/topic/messages");
        assert_eq!(value["body"]["senderId"], 1);
        assert_eq!(value["body"]["chatId"], 4);
        assert_eq!(value["body"]["body"], "See you at five");
    }

    #[test]
    fn test_decode_rejects_foreign_payload() {
        assert!(decode_event(r#"{"type":"noteCreated","id":"x"}"#).is_err());
        assert!(decode_event("not json").is_err());
    }

    #[test]
    fn test_decode_published_payload() {
        let event = sample_event();
        let decoded = decode_event(&encode_event(&event).unwrap()).unwrap();
        assert_eq!(decoded, event);
    }
}
