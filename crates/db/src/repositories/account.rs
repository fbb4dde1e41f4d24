//! Account repository.

use std::sync::Arc;

use crate::entities::{Account, AccountRole, account, account_role};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait, sea_query::Expr,
};
use tutorium_common::{AppError, AppResult};

/// Account repository for database operations.
#[derive(Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<account::Model>> {
        Account::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<account::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    /// Find accounts by IDs, ordered by ID.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<account::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Account::find()
            .filter(account::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(account::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<account::Model>> {
        Account::find()
            .filter(account::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an account together with its initial roles.
    ///
    /// The account row and its role rows are written in one transaction, so
    /// a failed grant leaves no account behind. A taken email is a `Conflict`.
    pub async fn create_with_roles(
        &self,
        model: account::ActiveModel,
        role_ids: &[i32],
        at: DateTime<Utc>,
    ) -> AppResult<account::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let account = model.insert(&txn).await.map_err(map_insert_err)?;

        if !role_ids.is_empty() {
            let rows = role_ids.iter().map(|&role_id| account_role::ActiveModel {
                account_id: Set(account.id),
                role_id: Set(role_id),
                granted_at: Set(at.into()),
            });

            AccountRole::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Set or clear the affiliation of an account.
    pub async fn set_affiliation(&self, id: i64, affiliation_id: Option<i64>) -> AppResult<u64> {
        let result = Account::update_many()
            .col_expr(account::Column::AffiliationId, Expr::value(affiliation_id))
            .filter(account::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Disable an account without deleting it.
    pub async fn disable(&self, id: i64) -> AppResult<u64> {
        let result = Account::update_many()
            .col_expr(account::Column::Enabled, Expr::value(false))
            .filter(account::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Hard-delete an account. Owned rows go with it through foreign key cascades.
    pub async fn delete(&self, id: i64) -> AppResult<u64> {
        let result = Account::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

fn map_insert_err(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Email already registered".to_string())
        }
        _ => AppError::Database(e.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_account(id: i64, email: &str) -> account::Model {
        account::Model {
            id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            description: None,
            affiliation_id: None,
            is_verified: false,
            verified_at: None,
            enabled: true,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let account = create_test_account(1, "ada@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[account.clone()]])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert_eq!(result, Some(account));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<account::Model>::new()])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.get_by_id(42).await;

        match result {
            Err(AppError::AccountNotFound(id)) => assert_eq!(id, 42),
            _ => panic!("Expected AccountNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        // No query results appended: any query would fail.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = AccountRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_create_account() {
        let account = create_test_account(7, "grace@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[account.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 7,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let active = account::ActiveModel {
            first_name: Set("Grace".to_string()),
            last_name: Set("Hopper".to_string()),
            email: Set("grace@example.com".to_string()),
            ..Default::default()
        };

        let result = repo
            .create_with_roles(active, &[1, 2], Utc::now())
            .await
            .unwrap();
        assert_eq!(result.id, 7);
        assert_eq!(result.email, "grace@example.com");
    }

    #[tokio::test]
    async fn test_create_with_roles_fails_whole_when_grant_fails() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_account(8, "alan@example.com")]])
                .append_exec_errors([DbErr::Custom("role insert failed".to_string())])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let active = account::ActiveModel {
            email: Set("alan@example.com".to_string()),
            ..Default::default()
        };

        let result = repo.create_with_roles(active, &[1], Utc::now()).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[test]
    fn test_non_unique_insert_error_is_database_error() {
        let err = map_insert_err(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_account_affects_nothing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        assert_eq!(repo.delete(99).await.unwrap(), 0);
    }
}
