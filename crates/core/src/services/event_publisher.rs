//! Event publisher service.
//!
//! Provides an abstraction for fanning persisted messages out to topic
//! subscribers. Implementations live in the api crate (in-process broadcast)
//! and the pubsub crate (Redis relay).

use crate::services::message::MessageProjection;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tutorium_common::AppResult;

/// Topic every saved chat message is published to.
pub const MESSAGES_TOPIC: &str = "/topic/messages";

/// Topics a client may subscribe to.
pub const KNOWN_TOPICS: &[&str] = &[MESSAGES_TOPIC];

/// A message addressed to a topic, as carried between instances and to sockets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEvent {
    /// Destination topic.
    pub topic: String,
    /// The persisted message.
    pub body: MessageProjection,
}

/// Trait for publishing persisted messages to topic subscribers.
///
/// This allows the core services to publish events without depending on the
/// transport that delivers them.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a persisted message to every subscriber of `topic`.
    async fn publish_message(&self, topic: &str, message: &MessageProjection) -> AppResult<()>;
}

/// A no-op implementation of `EventPublisher` for tests or when delivery is disabled.
#[derive(Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish_message(&self, _topic: &str, _message: &MessageProjection) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `EventPublisher` trait object.
pub type EventPublisherService = Arc<dyn EventPublisher>;

/// Whether clients may subscribe to `topic`.
#[must_use]
pub fn is_known_topic(topic: &str) -> bool {
    KNOWN_TOPICS.contains(&topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_topic_is_known() {
        assert!(is_known_topic("/topic/messages"));
        assert!(!is_known_topic("/topic/notes"));
    }
}
