//! Message store and delivery.
//!
//! Both the WebSocket and the REST entry points call [`MessageService::save_message`],
//! so a message is validated, persisted and broadcast the same way regardless
//! of how it arrived.

use crate::services::event_publisher::{EventPublisherService, MESSAGES_TOPIC};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tutorium_common::{AppError, AppResult};
use tutorium_db::{
    entities::message,
    repositories::{AccountRepository, ChatRepository, MessageRepository},
};
use validator::Validate;

/// A message as submitted by a client.
///
/// There is no timestamp field; unknown fields such as a client-side
/// `createdAt` are ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub sender_id: i64,

    pub receiver_id: i64,

    #[validate(length(min = 1, max = 4000))]
    pub body: String,

    #[serde(default)]
    pub chat_id: Option<i64>,
}

/// A persisted message.
///
/// This is the body of the REST response and of the WebSocket `message` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageProjection {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub chat_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<message::Model> for MessageProjection {
    fn from(m: message::Model) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            chat_id: m.chat_id,
            body: m.body,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

/// Message service.
#[derive(Clone)]
pub struct MessageService {
    message_repo: MessageRepository,
    account_repo: AccountRepository,
    chat_repo: ChatRepository,
    event_publisher: Option<EventPublisherService>,
}

impl MessageService {
    /// Create a new message service.
    #[must_use]
    pub const fn new(
        message_repo: MessageRepository,
        account_repo: AccountRepository,
        chat_repo: ChatRepository,
    ) -> Self {
        Self {
            message_repo,
            account_repo,
            chat_repo,
            event_publisher: None,
        }
    }

    /// Set the event publisher.
    pub fn set_event_publisher(&mut self, event_publisher: EventPublisherService) {
        self.event_publisher = Some(event_publisher);
    }

    /// Validate, persist and broadcast a message.
    ///
    /// Nothing is written unless the payload is valid, both participants
    /// exist and the referenced chat, if any, exists. A failed broadcast is
    /// logged and does not fail the call; the message is already durable.
    pub async fn save_message(&self, draft: MessageDraft) -> AppResult<MessageProjection> {
        draft.validate()?;

        let participants = self
            .account_repo
            .find_by_ids(&[draft.sender_id, draft.receiver_id])
            .await?;
        for id in [draft.sender_id, draft.receiver_id] {
            if !participants.iter().any(|a| a.id == id) {
                return Err(AppError::UnknownParticipant(id));
            }
        }

        if let Some(chat_id) = draft.chat_id {
            self.chat_repo
                .find_by_id(chat_id)
                .await?
                .ok_or(AppError::ChatNotFound(chat_id))?;
        }

        let model = message::ActiveModel {
            sender_id: Set(draft.sender_id),
            receiver_id: Set(draft.receiver_id),
            chat_id: Set(draft.chat_id),
            body: Set(draft.body),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let projection = MessageProjection::from(self.message_repo.create(model).await?);

        tracing::debug!(
            message_id = projection.id,
            sender_id = projection.sender_id,
            receiver_id = projection.receiver_id,
            "Saved message"
        );

        if let Some(ref event_publisher) = self.event_publisher
            && let Err(e) = event_publisher
                .publish_message(MESSAGES_TOPIC, &projection)
                .await
        {
            tracing::warn!(
                error = %e,
                message_id = projection.id,
                "Failed to publish message event"
            );
        }

        Ok(projection)
    }

    /// Messages of a chat ordered by timestamp, then ID.
    pub async fn list_chat_messages(&self, chat_id: i64) -> AppResult<Vec<MessageProjection>> {
        self.chat_repo
            .find_by_id(chat_id)
            .await?
            .ok_or(AppError::ChatNotFound(chat_id))?;

        let messages = self.message_repo.find_by_chat(chat_id).await?;
        Ok(messages.into_iter().map(MessageProjection::from).collect())
    }
}
