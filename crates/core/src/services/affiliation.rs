//! Affiliation service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tutorium_common::AppResult;
use tutorium_db::{entities::affiliation, repositories::AffiliationRepository};
use validator::Validate;

/// Input for creating an affiliation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffiliationInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Postal address. Required, may be free-form.
    #[validate(length(max = 1024))]
    pub address: String,
}

/// Affiliation service.
#[derive(Clone)]
pub struct AffiliationService {
    affiliation_repo: AffiliationRepository,
}

impl AffiliationService {
    /// Create a new affiliation service.
    #[must_use]
    pub const fn new(affiliation_repo: AffiliationRepository) -> Self {
        Self { affiliation_repo }
    }

    /// Create an affiliation.
    pub async fn create_affiliation(
        &self,
        input: CreateAffiliationInput,
    ) -> AppResult<affiliation::Model> {
        let input = CreateAffiliationInput {
            name: input.name.trim().to_string(),
            address: input.address,
        };
        input.validate()?;

        let model = affiliation::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let created = self.affiliation_repo.create(model).await?;
        tracing::info!(affiliation_id = created.id, "Created affiliation");
        Ok(created)
    }
}
