//! Verification edge repository.

use std::sync::Arc;

use crate::entities::{Account, AccountVerifier, account, account_verifier};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use tutorium_common::{AppError, AppResult};

/// Repository for the directed "verified by" edges between accounts.
///
/// Edges are looked up from the verified account only.
#[derive(Clone)]
pub struct VerifierRepository {
    db: Arc<DatabaseConnection>,
}

impl VerifierRepository {
    /// Create a new verifier repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record that `verifier_id` verified `account_id` and flag the account.
    ///
    /// Both writes share one transaction. Repeating the same edge is a no-op
    /// for the edge and keeps the original `verified_at`.
    pub async fn record_verification(
        &self,
        account_id: i64,
        verifier_id: i64,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let edge = account_verifier::ActiveModel {
            account_id: Set(account_id),
            verifier_id: Set(verifier_id),
            verified_at: Set(at.into()),
        };

        AccountVerifier::insert(edge)
            .on_conflict(
                OnConflict::columns([
                    account_verifier::Column::AccountId,
                    account_verifier::Column::VerifierId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Account::update_many()
            .col_expr(account::Column::IsVerified, Expr::value(true))
            .col_expr(account::Column::VerifiedAt, Expr::value(at))
            .filter(account::Column::Id.eq(account_id))
            .filter(account::Column::IsVerified.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Edges recorded for a verified account, oldest first.
    pub async fn verifiers_of(&self, account_id: i64) -> AppResult<Vec<account_verifier::Model>> {
        AccountVerifier::find()
            .filter(account_verifier::Column::AccountId.eq(account_id))
            .order_by_asc(account_verifier::Column::VerifiedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_record_verification_commits_edge_and_flag() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // edge
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // account flag
                    },
                ])
                .into_connection(),
        );

        let repo = VerifierRepository::new(db);
        let result = repo.record_verification(2, 1, Utc::now()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_verifiers_of() {
        let edge = account_verifier::Model {
            account_id: 2,
            verifier_id: 1,
            verified_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()]])
                .into_connection(),
        );

        let repo = VerifierRepository::new(db);
        let result = repo.verifiers_of(2).await.unwrap();

        assert_eq!(result, vec![edge]);
    }
}
