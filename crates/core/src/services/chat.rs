//! Chat lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tutorium_common::{AppError, AppResult};
use tutorium_db::repositories::{AccountRepository, ChatRepository};
use validator::Validate;

/// Input for creating a chat.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "a chat needs at least one participant"))]
    pub participant_ids: Vec<i64>,
}

/// Public view of a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatProjection {
    pub id: i64,
    pub name: Option<String>,
    pub participant_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

/// Chat service.
#[derive(Clone)]
pub struct ChatService {
    chat_repo: ChatRepository,
    account_repo: AccountRepository,
}

impl ChatService {
    /// Create a new chat service.
    #[must_use]
    pub const fn new(chat_repo: ChatRepository, account_repo: AccountRepository) -> Self {
        Self {
            chat_repo,
            account_repo,
        }
    }

    /// Create a chat and return its ID.
    ///
    /// Participant IDs are de-duplicated; every one of them must exist.
    pub async fn create_chat(&self, input: CreateChatInput) -> AppResult<i64> {
        input.validate()?;

        let mut participant_ids = input.participant_ids;
        participant_ids.sort_unstable();
        participant_ids.dedup();

        let accounts = self.account_repo.find_by_ids(&participant_ids).await?;
        if let Some(&missing) = participant_ids
            .iter()
            .find(|&&id| !accounts.iter().any(|a| a.id == id))
        {
            return Err(AppError::UnknownParticipant(missing));
        }

        let chat = self
            .chat_repo
            .create_with_participants(input.name, &participant_ids, Utc::now())
            .await?;

        tracing::info!(
            chat_id = chat.id,
            participants = participant_ids.len(),
            "Created chat"
        );

        Ok(chat.id)
    }

    /// Delete a chat. Its messages are kept without a chat reference.
    pub async fn delete_chat(&self, chat_id: i64) -> AppResult<()> {
        if !self.chat_repo.delete_retaining_messages(chat_id).await? {
            return Err(AppError::ChatNotFound(chat_id));
        }

        tracing::info!(chat_id, "Deleted chat");
        Ok(())
    }

    /// Find a chat with its participants.
    pub async fn find_chat(&self, chat_id: i64) -> AppResult<Option<ChatProjection>> {
        let Some(chat) = self.chat_repo.find_by_id(chat_id).await? else {
            return Ok(None);
        };

        let participant_ids = self.chat_repo.participant_ids(chat_id).await?;

        Ok(Some(ChatProjection {
            id: chat.id,
            name: chat.name,
            participant_ids,
            created_at: chat.created_at.with_timezone(&Utc),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use tutorium_db::entities::{account, chat, chat_participant};

    fn create_test_account(id: i64) -> account::Model {
        account::Model {
            id,
            first_name: "Test".to_string(),
            last_name: "Account".to_string(),
            email: format!("account{id}@example.com"),
            password_hash: "hash".to_string(),
            description: None,
            affiliation_id: None,
            is_verified: false,
            verified_at: None,
            enabled: true,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_chat(id: i64) -> chat::Model {
        chat::Model {
            id,
            name: None,
            created_at: Utc::now().into(),
        }
    }

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn create_test_service(
        chat_db: Arc<DatabaseConnection>,
        account_db: Arc<DatabaseConnection>,
    ) -> ChatService {
        ChatService::new(ChatRepository::new(chat_db), AccountRepository::new(account_db))
    }

    #[tokio::test]
    async fn test_create_chat_twice_yields_distinct_ids() {
        let chat_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_chat(1)], [create_test_chat(2)]])
                .append_exec_results([exec(2), exec(2)])
                .into_connection(),
        );
        let account_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    [create_test_account(1), create_test_account(2)],
                    [create_test_account(1), create_test_account(2)],
                ])
                .into_connection(),
        );

        let service = create_test_service(chat_db, account_db);
        let input = CreateChatInput {
            name: None,
            participant_ids: vec![2, 1, 2],
        };

        let first = service.create_chat(input.clone()).await.unwrap();
        let second = service.create_chat(input).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_chat_empty_participants_is_invalid() {
        let service = create_test_service(empty_db(), empty_db());
        let result = service
            .create_chat(CreateChatInput {
                name: Some("Empty".to_string()),
                participant_ids: vec![],
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_chat_unknown_participant() {
        let account_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_account(1)]])
                .into_connection(),
        );

        let service = create_test_service(empty_db(), account_db);
        let result = service
            .create_chat(CreateChatInput {
                name: None,
                participant_ids: vec![1, 999],
            })
            .await;

        assert!(matches!(result, Err(AppError::UnknownParticipant(999))));
    }

    #[tokio::test]
    async fn test_delete_chat_then_again_is_not_found() {
        let chat_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(2), exec(1), exec(0), exec(0)])
                .into_connection(),
        );

        let service = create_test_service(chat_db, empty_db());

        assert!(service.delete_chat(8).await.is_ok());
        assert!(matches!(
            service.delete_chat(8).await,
            Err(AppError::ChatNotFound(8))
        ));
    }

    #[tokio::test]
    async fn test_find_chat_includes_participants() {
        let now = Utc::now();
        let chat_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_chat(3)]])
                .append_query_results([[
                    chat_participant::Model {
                        chat_id: 3,
                        account_id: 1,
                        joined_at: now.into(),
                    },
                    chat_participant::Model {
                        chat_id: 3,
                        account_id: 2,
                        joined_at: now.into(),
                    },
                ]])
                .into_connection(),
        );

        let service = create_test_service(chat_db, empty_db());
        let chat = service.find_chat(3).await.unwrap().unwrap();

        assert_eq!(chat.participant_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_find_chat_absent() {
        let chat_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<chat::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(chat_db, empty_db());
        assert!(service.find_chat(3).await.unwrap().is_none());
    }
}
