//! Message repository.

use std::sync::Arc;

use crate::entities::{Message, message};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};
use tutorium_common::{AppError, AppResult};

/// Repository for chat messages.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a message.
    pub async fn create(&self, model: message::ActiveModel) -> AppResult<message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Messages of a chat in delivery order: timestamp, then ID.
    pub async fn find_by_chat(&self, chat_id: i64) -> AppResult<Vec<message::Model>> {
        Message::find()
            .filter(message::Column::ChatId.eq(chat_id))
            .order_by_asc(message::Column::CreatedAt)
            .order_by_asc(message::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of messages an account sent or received.
    pub async fn count_by_account(&self, account_id: i64) -> AppResult<u64> {
        Message::find()
            .filter(
                Condition::any()
                    .add(message::Column::SenderId.eq(account_id))
                    .add(message::Column::ReceiverId.eq(account_id)),
            )
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Clear the chat reference of every message in a chat. Rows are kept.
    pub async fn detach_from_chat(&self, chat_id: i64) -> AppResult<u64> {
        detach_chat(self.db.as_ref(), chat_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Set `chat_id` to NULL on all messages of a chat, on any connection or transaction.
pub(crate) async fn detach_chat<C: ConnectionTrait>(conn: &C, chat_id: i64) -> Result<u64, DbErr> {
    let result = Message::update_many()
        .col_expr(message::Column::ChatId, Expr::value(Option::<i64>::None))
        .filter(message::Column::ChatId.eq(chat_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_message(id: i64, sender_id: i64, receiver_id: i64) -> message::Model {
        message::Model {
            id,
            sender_id,
            receiver_id,
            chat_id: Some(10),
            body: "hello".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_message() {
        let message = create_test_message(1, 1, 2);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[message.clone()]])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        let active = message::ActiveModel {
            sender_id: Set(1),
            receiver_id: Set(2),
            chat_id: Set(Some(10)),
            body: Set("hello".to_string()),
            created_at: Set(message.created_at),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result, message);
    }

    #[tokio::test]
    async fn test_find_by_chat() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_message(1, 1, 2), create_test_message(2, 2, 1)]])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        let result = repo.find_by_chat(10).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 1);
    }

    #[tokio::test]
    async fn test_count_by_account() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        assert_eq!(repo.count_by_account(1).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_detach_from_chat_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 4,
                }])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        assert_eq!(repo.detach_from_chat(10).await.unwrap(), 4);
    }
}
