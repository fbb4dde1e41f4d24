//! Chat repository.

use std::sync::Arc;

use super::message::detach_chat;
use crate::entities::{Chat, ChatParticipant, chat, chat_participant};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tutorium_common::{AppError, AppResult};

/// Repository for chats and their participants.
#[derive(Clone)]
pub struct ChatRepository {
    db: Arc<DatabaseConnection>,
}

impl ChatRepository {
    /// Create a new chat repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a chat by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<chat::Model>> {
        Chat::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Participant IDs of a chat, ascending.
    pub async fn participant_ids(&self, chat_id: i64) -> AppResult<Vec<i64>> {
        let rows = ChatParticipant::find()
            .filter(chat_participant::Column::ChatId.eq(chat_id))
            .order_by_asc(chat_participant::Column::AccountId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|p| p.account_id).collect())
    }

    /// Create a chat together with its participant rows in one transaction.
    ///
    /// `participant_ids` must already be de-duplicated and non-empty.
    pub async fn create_with_participants(
        &self,
        name: Option<String>,
        participant_ids: &[i64],
        at: DateTime<Utc>,
    ) -> AppResult<chat::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let chat = chat::ActiveModel {
            name: Set(name),
            created_at: Set(at.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if !participant_ids.is_empty() {
            let rows = participant_ids
                .iter()
                .map(|&account_id| chat_participant::ActiveModel {
                    chat_id: Set(chat.id),
                    account_id: Set(account_id),
                    joined_at: Set(at.into()),
                });

            ChatParticipant::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(chat)
    }

    /// Delete a chat while keeping its messages.
    ///
    /// Messages are detached and the chat row is deleted in one transaction;
    /// participant rows follow by cascade. Returns `false`, with nothing
    /// written, when no chat has the given ID.
    pub async fn delete_retaining_messages(&self, chat_id: i64) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let detached = detach_chat(&txn, chat_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = Chat::delete_by_id(chat_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if deleted.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(false);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(chat_id, detached, "Deleted chat and retained its messages");
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_chat(id: i64) -> chat::Model {
        chat::Model {
            id,
            name: Some("Algebra study group".to_string()),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_with_participants() {
        let chat = create_test_chat(5);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[chat.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = ChatRepository::new(db);
        let result = repo
            .create_with_participants(chat.name.clone(), &[1, 2], Utc::now())
            .await
            .unwrap();

        assert_eq!(result.id, 5);
    }

    #[tokio::test]
    async fn test_participant_ids() {
        let now = Utc::now();
        let rows = vec![
            chat_participant::Model {
                chat_id: 5,
                account_id: 1,
                joined_at: now.into(),
            },
            chat_participant::Model {
                chat_id: 5,
                account_id: 2,
                joined_at: now.into(),
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let repo = ChatRepository::new(db);
        assert_eq!(repo.participant_ids(5).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_delete_retaining_messages_existing_chat() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3, // messages detached
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // chat deleted
                    },
                ])
                .into_connection(),
        );

        let repo = ChatRepository::new(db);
        assert!(repo.delete_retaining_messages(5).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_retaining_messages_missing_chat() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = ChatRepository::new(db);
        assert!(!repo.delete_retaining_messages(404).await.unwrap());
    }
}
