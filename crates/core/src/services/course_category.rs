//! Course category service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tutorium_common::{AppError, AppResult};
use tutorium_db::{entities::course_category, repositories::CourseCategoryRepository};
use validator::Validate;

/// Input for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

/// Course category service.
#[derive(Clone)]
pub struct CourseCategoryService {
    category_repo: CourseCategoryRepository,
}

impl CourseCategoryService {
    /// Create a new course category service.
    #[must_use]
    pub const fn new(category_repo: CourseCategoryRepository) -> Self {
        Self { category_repo }
    }

    /// Create a category. The creation time is always the server clock.
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> AppResult<course_category::Model> {
        let input = CreateCategoryInput {
            name: input.name.trim().to_string(),
        };
        input.validate()?;

        if self
            .category_repo
            .find_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Category already exists: {}",
                input.name
            )));
        }

        let model = course_category::ActiveModel {
            name: Set(input.name),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        self.category_repo.create(model).await
    }

    /// All categories ordered by name.
    pub async fn list_categories(&self) -> AppResult<Vec<course_category::Model>> {
        self.category_repo.find_all().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_category(id: i64, name: &str) -> course_category::Model {
        course_category::Model {
            id,
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_category_trims_name() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    Vec::<course_category::Model>::new(),
                    vec![create_test_category(1, "Physics")],
                ])
                .into_connection(),
        );

        let service = CourseCategoryService::new(CourseCategoryRepository::new(db));
        let result = service
            .create_category(CreateCategoryInput {
                name: "  Physics ".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.name, "Physics");
    }

    #[tokio::test]
    async fn test_create_category_blank_name_is_invalid() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CourseCategoryService::new(CourseCategoryRepository::new(db));
        let result = service
            .create_category(CreateCategoryInput {
                name: "   ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_category_duplicate_conflicts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_category(1, "Physics")]])
                .into_connection(),
        );

        let service = CourseCategoryService::new(CourseCategoryRepository::new(db));
        let result = service
            .create_category(CreateCategoryInput {
                name: "Physics".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
