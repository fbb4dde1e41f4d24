//! Affiliation repository.

use std::sync::Arc;

use crate::entities::{Affiliation, affiliation};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use tutorium_common::{AppError, AppResult};

/// Repository for institutional affiliations.
#[derive(Clone)]
pub struct AffiliationRepository {
    db: Arc<DatabaseConnection>,
}

impl AffiliationRepository {
    /// Create a new affiliation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an affiliation by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<affiliation::Model>> {
        Affiliation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new affiliation.
    pub async fn create(&self, model: affiliation::ActiveModel) -> AppResult<affiliation::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
