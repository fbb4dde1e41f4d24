//! Rating repository.

use std::sync::Arc;

use crate::entities::{CourseRating, TutorRating, course_rating, tutor_rating};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tutorium_common::{AppError, AppResult};

/// Repository for tutor and course ratings.
///
/// Ratings belong to the student who gave them; deletes are scoped to that owner.
#[derive(Clone)]
pub struct RatingRepository {
    db: Arc<DatabaseConnection>,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a tutor rating.
    pub async fn create_tutor_rating(
        &self,
        model: tutor_rating::ActiveModel,
    ) -> AppResult<tutor_rating::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a course rating.
    pub async fn create_course_rating(
        &self,
        model: course_rating::ActiveModel,
    ) -> AppResult<course_rating::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Tutor ratings given by a student, newest first.
    pub async fn find_tutor_ratings_by_student(
        &self,
        student_id: i64,
    ) -> AppResult<Vec<tutor_rating::Model>> {
        TutorRating::find()
            .filter(tutor_rating::Column::StudentId.eq(student_id))
            .order_by_desc(tutor_rating::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a tutor rating if `student_id` gave it.
    pub async fn delete_tutor_rating_owned_by(
        &self,
        student_id: i64,
        rating_id: i64,
    ) -> AppResult<u64> {
        let result = TutorRating::delete_many()
            .filter(tutor_rating::Column::Id.eq(rating_id))
            .filter(tutor_rating::Column::StudentId.eq(student_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Delete a course rating if `student_id` gave it.
    pub async fn delete_course_rating_owned_by(
        &self,
        student_id: i64,
        rating_id: i64,
    ) -> AppResult<u64> {
        let result = CourseRating::delete_many()
            .filter(course_rating::Column::Id.eq(rating_id))
            .filter(course_rating::Column::StudentId.eq(student_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
