//! Role repository.

use std::sync::Arc;

use crate::entities::{AccountRole, Role, account_role, role};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, sea_query::OnConflict,
};
use tutorium_common::{AppError, AppResult};

/// Repository for roles and account-role membership.
#[derive(Clone)]
pub struct RoleRepository {
    db: Arc<DatabaseConnection>,
}

impl RoleRepository {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a role by name. Names are matched case-insensitively.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<role::Model>> {
        Role::find()
            .filter(role::Column::Name.eq(name.to_uppercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Roles held by an account, ordered by name.
    pub async fn find_by_account(&self, account_id: i64) -> AppResult<Vec<role::Model>> {
        Role::find()
            .join(JoinType::InnerJoin, role::Relation::AccountRoles.def())
            .filter(account_role::Column::AccountId.eq(account_id))
            .order_by_asc(role::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count accounts holding the named role. Unknown names count zero.
    pub async fn count_accounts_with(&self, name: &str) -> AppResult<u64> {
        AccountRole::find()
            .join(JoinType::InnerJoin, account_role::Relation::Role.def())
            .filter(role::Column::Name.eq(name.to_uppercase()))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether the account holds the named role.
    pub async fn has_role(&self, account_id: i64, name: &str) -> AppResult<bool> {
        let count = AccountRole::find()
            .join(JoinType::InnerJoin, account_role::Relation::Role.def())
            .filter(account_role::Column::AccountId.eq(account_id))
            .filter(role::Column::Name.eq(name.to_uppercase()))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Grant a role to an account.
    ///
    /// Granting a role the account already holds leaves the existing row
    /// untouched and returns 0.
    pub async fn grant(&self, account_id: i64, role_id: i32) -> AppResult<u64> {
        let membership = account_role::ActiveModel {
            account_id: Set(account_id),
            role_id: Set(role_id),
            granted_at: Set(Utc::now().into()),
        };

        AccountRole::insert(membership)
            .on_conflict(
                OnConflict::columns([account_role::Column::AccountId, account_role::Column::RoleId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
