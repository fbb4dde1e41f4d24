//! Course category repository.

use std::sync::Arc;

use crate::entities::{CourseCategory, course_category};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tutorium_common::{AppError, AppResult};

/// Repository for course categories.
#[derive(Clone)]
pub struct CourseCategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CourseCategoryRepository {
    /// Create a new course category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<course_category::Model>> {
        CourseCategory::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a category by its exact name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<course_category::Model>> {
        CourseCategory::find()
            .filter(course_category::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All categories ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<course_category::Model>> {
        CourseCategory::find()
            .order_by_asc(course_category::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new category.
    pub async fn create(
        &self,
        model: course_category::ActiveModel,
    ) -> AppResult<course_category::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
