//! Course repository.

use std::sync::Arc;

use crate::entities::{Course, CourseParticipant, course, course_participant};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use tutorium_common::{AppError, AppResult};

/// Repository for courses and enrollments.
#[derive(Clone)]
pub struct CourseRepository {
    db: Arc<DatabaseConnection>,
}

impl CourseRepository {
    /// Create a new course repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a course by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<course::Model>> {
        Course::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new course.
    pub async fn create(&self, model: course::ActiveModel) -> AppResult<course::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Enroll an account in a course. Re-enrolling is a no-op returning 0.
    pub async fn enroll(&self, course_id: i64, account_id: i64) -> AppResult<u64> {
        let enrollment = course_participant::ActiveModel {
            course_id: Set(course_id),
            account_id: Set(account_id),
            enrolled_at: Set(Utc::now().into()),
        };

        CourseParticipant::insert(enrollment)
            .on_conflict(
                OnConflict::columns([
                    course_participant::Column::CourseId,
                    course_participant::Column::AccountId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the accounts enrolled in a course, ascending.
    pub async fn participant_ids(&self, course_id: i64) -> AppResult<Vec<i64>> {
        let rows = CourseParticipant::find()
            .filter(course_participant::Column::CourseId.eq(course_id))
            .order_by_asc(course_participant::Column::AccountId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|p| p.account_id).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_enroll_twice_second_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        assert_eq!(repo.enroll(1, 2).await.unwrap(), 1);
        assert_eq!(repo.enroll(1, 2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_participant_ids() {
        let now = Utc::now();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    course_participant::Model {
                        course_id: 1,
                        account_id: 4,
                        enrolled_at: now.into(),
                    },
                    course_participant::Model {
                        course_id: 1,
                        account_id: 9,
                        enrolled_at: now.into(),
                    },
                ]])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        assert_eq!(repo.participant_ids(1).await.unwrap(), vec![4, 9]);
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<course::Model>::new()])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        assert!(repo.find_by_id(77).await.unwrap().is_none());
    }
}
