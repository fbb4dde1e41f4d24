//! Progress repository.

use std::sync::Arc;

use crate::entities::{Progress, progress};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tutorium_common::{AppError, AppResult};

/// Repository for per-student course progress.
#[derive(Clone)]
pub struct ProgressRepository {
    db: Arc<DatabaseConnection>,
}

impl ProgressRepository {
    /// Create a new progress repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record progress.
    pub async fn create(&self, model: progress::ActiveModel) -> AppResult<progress::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Progress records of a student, newest first.
    pub async fn find_by_student(&self, student_id: i64) -> AppResult<Vec<progress::Model>> {
        Progress::find()
            .filter(progress::Column::StudentId.eq(student_id))
            .order_by_desc(progress::Column::RecordedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a progress record if it belongs to `student_id`.
    pub async fn delete_owned_by(&self, student_id: i64, progress_id: i64) -> AppResult<u64> {
        let result = Progress::delete_many()
            .filter(progress::Column::Id.eq(progress_id))
            .filter(progress::Column::StudentId.eq(student_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_student() {
        let record = progress::Model {
            id: 1,
            student_id: 2,
            course_id: 3,
            points: 42,
            recorded_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[record.clone()]])
                .into_connection(),
        );

        let repo = ProgressRepository::new(db);
        assert_eq!(repo.find_by_student(2).await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_delete_owned_by() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ProgressRepository::new(db);
        assert_eq!(repo.delete_owned_by(2, 1).await.unwrap(), 1);
    }
}
