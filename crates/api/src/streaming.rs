//! WebSocket messaging.
//!
//! A socket subscribes to topics and may submit messages. Submitted messages
//! go through the same `MessageService::save_message` call as the REST
//! endpoint; the saved projection then reaches every socket subscribed to
//! the topic it was published on.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tutorium_common::AppResult;
use tutorium_core::{EventPublisher, MessageDraft, MessageProjection, TopicEvent, is_known_topic};

use crate::middleware::AppState;

/// Client-to-server frame.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum ClientFrame {
    /// Start receiving messages published on a topic.
    Subscribe { topic: String },
    /// Stop receiving messages published on a topic.
    Unsubscribe { topic: String },
    /// Persist a message and publish it.
    SendMessage(MessageDraft),
}

/// Server-to-client frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum ServerFrame {
    /// Subscription accepted.
    Subscribed { topic: String },
    /// A message published on a subscribed topic.
    Message(TopicEvent),
    /// A frame from this socket could not be handled.
    Error { code: String, message: String },
}

impl ServerFrame {
    fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// In-process topic fan-out shared by every socket of this instance.
#[derive(Clone)]
pub struct StreamingState {
    tx: Arc<broadcast::Sender<TopicEvent>>,
}

impl StreamingState {
    /// Create a new streaming state buffering up to `capacity` events per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx: Arc::new(tx) }
    }

    /// Sender feeding every socket; handed to the Redis relay when one is configured.
    #[must_use]
    pub fn sender(&self) -> broadcast::Sender<TopicEvent> {
        self.tx.as_ref().clone()
    }

    /// Receive every event delivered to this instance.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TopicEvent> {
        self.tx.subscribe()
    }

    /// Deliver an event to the sockets of this instance.
    pub fn deliver(&self, event: TopicEvent) {
        if self.tx.send(event).is_err() {
            debug!("No sockets connected for topic event");
        }
    }
}

impl Default for StreamingState {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl EventPublisher for StreamingState {
    async fn publish_message(&self, topic: &str, message: &MessageProjection) -> AppResult<()> {
        self.deliver(TopicEvent {
            topic: topic.to_string(),
            body: message.clone(),
        });
        Ok(())
    }
}

/// WebSocket handler for messaging.
pub async fn streaming_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    info!("New streaming connection");

    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one socket until the client closes it or the connection fails.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.streaming.subscribe();
    let mut topics: HashSet<String> = HashSet::new();

    loop {
        tokio::select! {
            msg = receiver.next() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => {
                        let reply = match serde_json::from_str::<ClientFrame>(&text) {
                            Ok(frame) => handle_client_frame(frame, &mut topics, &state).await,
                            Err(e) => {
                                debug!("Failed to parse client frame: {}", e);
                                Some(ServerFrame::error("BAD_REQUEST", format!("Malformed frame: {e}")))
                            }
                        };
                        if let Some(reply) = reply
                            && !send_frame(&mut sender, &reply).await
                        {
                            break;
                        }
                    }
                    Message::Ping(data) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => {
                        info!("Client closed connection");
                        break;
                    }
                    _ => {}
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Some(frame) = frame_for_subscriber(event, &topics)
                            && !send_frame(&mut sender, &frame).await
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Streaming connection lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!("Streaming connection closed");
}

async fn send_frame(sender: &mut SplitSink<WebSocket, Message>, frame: &ServerFrame) -> bool {
    match serde_json::to_string(frame) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!("Failed to serialize server frame: {}", e);
            true
        }
    }
}

/// Handle one client frame. Returns the reply for the sending socket, if any.
///
/// A successful `sendMessage` has no direct reply; the sender sees the
/// message like everyone else if it is subscribed to the topic.
pub async fn handle_client_frame(
    frame: ClientFrame,
    topics: &mut HashSet<String>,
    state: &AppState,
) -> Option<ServerFrame> {
    match frame {
        ClientFrame::Subscribe { topic } => {
            if !is_known_topic(&topic) {
                return Some(ServerFrame::error(
                    "UNKNOWN_TOPIC",
                    format!("Unknown topic: {topic}"),
                ));
            }
            debug!(topic = %topic, "Topic subscribed");
            topics.insert(topic.clone());
            Some(ServerFrame::Subscribed { topic })
        }
        ClientFrame::Unsubscribe { topic } => {
            topics.remove(&topic);
            debug!(topic = %topic, "Topic unsubscribed");
            None
        }
        ClientFrame::SendMessage(draft) => match state.message_service.save_message(draft).await {
            Ok(_) => None,
            Err(e) => {
                if e.is_server_error() {
                    warn!(error = %e, "Failed to save message from socket");
                }
                Some(ServerFrame::error(e.error_code(), e.to_string()))
            }
        },
    }
}

/// The frame to forward for `event`, if the socket is subscribed to its topic.
#[must_use]
pub fn frame_for_subscriber(event: TopicEvent, topics: &HashSet<String>) -> Option<ServerFrame> {
    topics
        .contains(&event.topic)
        .then(|| ServerFrame::Message(event))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tutorium_core::MESSAGES_TOPIC;

    fn projection() -> MessageProjection {
        MessageProjection {
            id: 3,
            sender_id: 1,
            receiver_id: 2,
            chat_id: None,
            body: "hello".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_client_frames_parse() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"subscribe","body":{"topic":"/topic/messages"}}"#)
                .unwrap();
        assert!(matches!(frame, ClientFrame::Subscribe { topic } if topic == MESSAGES_TOPIC));

        let frame: ClientFrame = serde_json::from_str(
            r#"{"type":"sendMessage","body":{"senderId":1,"receiverId":2,"body":"hi","chatId":4}}"#,
        )
        .unwrap();
        match frame {
            ClientFrame::SendMessage(draft) => {
                assert_eq!(draft.sender_id, 1);
                assert_eq!(draft.receiver_id, 2);
                assert_eq!(draft.chat_id, Some(4));
            }
            other => panic!("Expected SendMessage, got {other:?}"),
        }

        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"connect","body":{}}"#).is_err());
    }

    #[test]
    fn test_message_frame_shape() {
        let frame = ServerFrame::Message(TopicEvent {
            topic: MESSAGES_TOPIC.to_string(),
            body: projection(),
        });
        let json = serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "message");
        assert_eq!(json["body"]["topic"], "/topic/messages");
        assert_eq!(json["body"]["body"]["senderId"], 1);
        assert_eq!(json["body"]["body"]["createdAt"], "2025-03-01T09:30:00Z");
    }

    #[test]
    fn test_error_frame_shape() {
        let json = serde_json::to_value(ServerFrame::error("CHAT_NOT_FOUND", "nope")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "error",
                "body": { "code": "CHAT_NOT_FOUND", "message": "nope" }
            })
        );
    }

    #[test]
    fn test_only_subscribed_topics_are_forwarded() {
        let event = TopicEvent {
            topic: MESSAGES_TOPIC.to_string(),
            body: projection(),
        };
        let mut topics = HashSet::new();
        assert!(frame_for_subscriber(event.clone(), &topics).is_none());

        topics.insert(MESSAGES_TOPIC.to_string());
        assert_eq!(
            frame_for_subscriber(event.clone(), &topics),
            Some(ServerFrame::Message(event))
        );
    }

    #[tokio::test]
    async fn test_streaming_state_publishes_to_receivers() {
        let streaming = StreamingState::new(8);
        let mut rx = streaming.subscribe();

        streaming
            .publish_message(MESSAGES_TOPIC, &projection())
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.topic, MESSAGES_TOPIC);
        assert_eq!(event.body, projection());
    }

    #[tokio::test]
    async fn test_publish_without_sockets_succeeds() {
        let streaming = StreamingState::new(8);
        assert!(
            streaming
                .publish_message(MESSAGES_TOPIC, &projection())
                .await
                .is_ok()
        );
    }
}
