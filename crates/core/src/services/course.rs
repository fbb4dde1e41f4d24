//! Course service.

use crate::services::account::AccountSummary;
use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use tutorium_common::{AppError, AppResult};
use tutorium_db::{
    entities::{course, role},
    repositories::{AccountRepository, CourseCategoryRepository, CourseRepository, RoleRepository},
};
use validator::Validate;

/// Input for creating a course.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 512))]
    pub description_short: Option<String>,

    pub description_long: Option<String>,

    pub tutor_id: i64,

    pub category_id: Option<i64>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

/// Course service.
#[derive(Clone)]
pub struct CourseService {
    course_repo: CourseRepository,
    category_repo: CourseCategoryRepository,
    account_repo: AccountRepository,
    role_repo: RoleRepository,
}

impl CourseService {
    /// Create a new course service.
    #[must_use]
    pub const fn new(
        course_repo: CourseRepository,
        category_repo: CourseCategoryRepository,
        account_repo: AccountRepository,
        role_repo: RoleRepository,
    ) -> Self {
        Self {
            course_repo,
            category_repo,
            account_repo,
            role_repo,
        }
    }

    /// Create a course taught by an account holding the tutor role.
    pub async fn create_course(&self, input: CreateCourseInput) -> AppResult<course::Model> {
        input.validate()?;

        if let (Some(start), Some(end)) = (input.start_date, input.end_date)
            && end < start
        {
            return Err(AppError::Validation(
                "Course cannot end before it starts".to_string(),
            ));
        }

        self.account_repo.get_by_id(input.tutor_id).await?;
        if !self.role_repo.has_role(input.tutor_id, role::TUTOR).await? {
            return Err(AppError::Forbidden(format!(
                "Account {} is not a tutor",
                input.tutor_id
            )));
        }

        if let Some(category_id) = input.category_id
            && self.category_repo.find_by_id(category_id).await?.is_none()
        {
            return Err(AppError::NotFound(format!(
                "Category not found: {category_id}"
            )));
        }

        let model = course::ActiveModel {
            name: Set(input.name),
            description_short: Set(input.description_short),
            description_long: Set(input.description_long),
            tutor_id: Set(input.tutor_id),
            category_id: Set(input.category_id),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        self.course_repo.create(model).await
    }

    /// Enroll an account in a course. Enrolling twice changes nothing.
    pub async fn enroll(&self, course_id: i64, account_id: i64) -> AppResult<()> {
        self.course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course not found: {course_id}")))?;
        self.account_repo.get_by_id(account_id).await?;

        if self.course_repo.enroll(course_id, account_id).await? > 0 {
            tracing::debug!(course_id, account_id, "Enrolled account");
        }
        Ok(())
    }

    /// Accounts enrolled in a course.
    pub async fn participants(&self, course_id: i64) -> AppResult<Vec<AccountSummary>> {
        let ids = self.course_repo.participant_ids(course_id).await?;
        let accounts = self.account_repo.find_by_ids(&ids).await?;
        Ok(accounts.into_iter().map(AccountSummary::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use tutorium_db::entities::{account, course_participant};

    fn create_test_account(id: i64) -> account::Model {
        account::Model {
            id,
            first_name: "Test".to_string(),
            last_name: format!("Student{id}"),
            email: format!("student{id}@example.com"),
            password_hash: "hash".to_string(),
            description: None,
            affiliation_id: None,
            is_verified: false,
            verified_at: None,
            enabled: true,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_course(id: i64) -> course::Model {
        course::Model {
            id,
            name: "Statistics".to_string(),
            description_short: None,
            description_long: None,
            tutor_id: 1,
            category_id: None,
            start_date: None,
            end_date: None,
            created_at: Utc::now().into(),
        }
    }

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn create_test_service(
        course_db: Arc<DatabaseConnection>,
        account_db: Arc<DatabaseConnection>,
        role_db: Arc<DatabaseConnection>,
    ) -> CourseService {
        CourseService::new(
            CourseRepository::new(course_db),
            CourseCategoryRepository::new(empty_db()),
            AccountRepository::new(account_db),
            RoleRepository::new(role_db),
        )
    }

    #[tokio::test]
    async fn test_enroll_unknown_course_is_not_found() {
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<course::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(course_db, empty_db(), empty_db());
        let result = service.enroll(5, 1).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_enroll_is_idempotent() {
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_course(5)], [create_test_course(5)]])
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
        let account_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_account(2)], [create_test_account(2)]])
                .into_connection(),
        );

        let service = create_test_service(course_db, account_db, empty_db());
        assert!(service.enroll(5, 2).await.is_ok());
        assert!(service.enroll(5, 2).await.is_ok());
    }

    #[tokio::test]
    async fn test_participants() {
        let now = Utc::now();
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[course_participant::Model {
                    course_id: 5,
                    account_id: 2,
                    enrolled_at: now.into(),
                }]])
                .into_connection(),
        );
        let account_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_account(2)]])
                .into_connection(),
        );

        let service = create_test_service(course_db, account_db, empty_db());
        let result = service.participants(5).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].last_name, "Student2");
    }

    #[tokio::test]
    async fn test_create_course_requires_tutor() {
        let account_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_account(1)]])
                .into_connection(),
        );
        let role_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let service = create_test_service(empty_db(), account_db, role_db);
        let result = service
            .create_course(CreateCourseInput {
                name: "Statistics".to_string(),
                description_short: None,
                description_long: None,
                tutor_id: 1,
                category_id: None,
                start_date: None,
                end_date: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_course_end_before_start_is_invalid() {
        let service = create_test_service(empty_db(), empty_db(), empty_db());
        let result = service
            .create_course(CreateCourseInput {
                name: "Statistics".to_string(),
                description_short: None,
                description_long: None,
                tutor_id: 1,
                category_id: None,
                start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
                end_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
