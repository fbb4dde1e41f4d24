//! Meeting repository.

use std::sync::Arc;

use crate::entities::{Meeting, MeetingParticipant, meeting, meeting_participant};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, sea_query::OnConflict,
};
use tutorium_common::{AppError, AppResult};

/// Repository for meetings and their participants.
#[derive(Clone)]
pub struct MeetingRepository {
    db: Arc<DatabaseConnection>,
}

impl MeetingRepository {
    /// Create a new meeting repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a meeting by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<meeting::Model>> {
        Meeting::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new meeting.
    pub async fn create(&self, model: meeting::ActiveModel) -> AppResult<meeting::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add an account to a meeting. Adding an existing participant returns 0.
    pub async fn add_participant(&self, meeting_id: i64, account_id: i64) -> AppResult<u64> {
        let participant = meeting_participant::ActiveModel {
            meeting_id: Set(meeting_id),
            account_id: Set(account_id),
        };

        MeetingParticipant::insert(participant)
            .on_conflict(
                OnConflict::columns([
                    meeting_participant::Column::MeetingId,
                    meeting_participant::Column::AccountId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the accounts taking part in a meeting, ascending.
    pub async fn participant_ids(&self, meeting_id: i64) -> AppResult<Vec<i64>> {
        let rows = MeetingParticipant::find()
            .filter(meeting_participant::Column::MeetingId.eq(meeting_id))
            .order_by_asc(meeting_participant::Column::AccountId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|p| p.account_id).collect())
    }

    /// Meetings an account takes part in, soonest first.
    pub async fn find_by_participant(&self, account_id: i64) -> AppResult<Vec<meeting::Model>> {
        Meeting::find()
            .join(JoinType::InnerJoin, meeting::Relation::Participants.def())
            .filter(meeting_participant::Column::AccountId.eq(account_id))
            .order_by_asc(meeting::Column::StartsAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_participant() {
        let meeting = meeting::Model {
            id: 1,
            title: "Exam preparation".to_string(),
            starts_at: Utc::now().into(),
            duration_minutes: 90,
            location: Some("Room 4.12".to_string()),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[meeting.clone()]])
                .into_connection(),
        );

        let repo = MeetingRepository::new(db);
        assert_eq!(repo.find_by_participant(3).await.unwrap(), vec![meeting]);
    }

    #[tokio::test]
    async fn test_add_participant() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = MeetingRepository::new(db);
        assert_eq!(repo.add_participant(1, 3).await.unwrap(), 1);
    }
}
