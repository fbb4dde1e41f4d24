//! Identity and role model.

use crate::services::ownership::{DeletionPolicy, OwnedRelation};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tutorium_common::{AppError, AppResult};
use tutorium_db::{
    entities::{account, role},
    repositories::{
        AccountRepository, AffiliationRepository, MessageRepository, RoleRepository,
        VerifierRepository,
    },
};
use validator::Validate;

/// Roles an account may pick for itself at registration.
const SELF_ASSIGNABLE_ROLES: &[&str] = &[role::STUDENT, role::TUTOR];

/// Public view of an account. Never carries the password hash or verifier edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProjection {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub description: Option<String>,
    pub affiliation_id: Option<i64>,
    pub roles: Vec<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl AccountProjection {
    fn from_model(m: account::Model, roles: Vec<String>) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            description: m.description,
            affiliation_id: m.affiliation_id,
            roles,
            is_verified: m.is_verified,
            verified_at: m.verified_at.map(|t| t.with_timezone(&Utc)),
            enabled: m.enabled,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }

    /// Whether the account holds the named role.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(name))
    }
}

/// Name-only view of an account used in participant lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<account::Model> for AccountSummary {
    fn from(m: account::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
        }
    }
}

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 2048))]
    pub description: Option<String>,

    /// Initial roles. Defaults to `STUDENT` when empty.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Outcome of [`AccountService::remove_account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRemoval {
    /// Messages still reference the account, so it was disabled instead.
    Archived,
    /// The account row is gone; ratings and progress went with it.
    Deleted,
}

/// Account service.
#[derive(Clone)]
pub struct AccountService {
    account_repo: AccountRepository,
    role_repo: RoleRepository,
    verifier_repo: VerifierRepository,
    affiliation_repo: AffiliationRepository,
    message_repo: MessageRepository,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(
        account_repo: AccountRepository,
        role_repo: RoleRepository,
        verifier_repo: VerifierRepository,
        affiliation_repo: AffiliationRepository,
        message_repo: MessageRepository,
    ) -> Self {
        Self {
            account_repo,
            role_repo,
            verifier_repo,
            affiliation_repo,
            message_repo,
        }
    }

    async fn project(&self, model: account::Model) -> AppResult<AccountProjection> {
        let roles = self
            .role_repo
            .find_by_account(model.id)
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();
        Ok(AccountProjection::from_model(model, roles))
    }

    /// Find an account by ID.
    pub async fn find_account_by_id(&self, id: i64) -> AppResult<Option<AccountProjection>> {
        match self.account_repo.find_by_id(id).await? {
            Some(model) => Ok(Some(self.project(model).await?)),
            None => Ok(None),
        }
    }

    /// Get an account by ID, failing with `AccountNotFound`.
    pub async fn get_account_by_id(&self, id: i64) -> AppResult<AccountProjection> {
        let model = self.account_repo.get_by_id(id).await?;
        self.project(model).await
    }

    /// Number of accounts holding a role. Unknown role names count zero.
    pub async fn count_by_role(&self, role_name: &str) -> AppResult<u64> {
        self.role_repo.count_accounts_with(role_name).await
    }

    /// Number of students.
    pub async fn student_count(&self) -> AppResult<u64> {
        self.count_by_role(role::STUDENT).await
    }

    /// Number of tutors.
    pub async fn tutor_count(&self) -> AppResult<u64> {
        self.count_by_role(role::TUTOR).await
    }

    /// Find an account that holds the tutor role.
    pub async fn get_tutor_by_id(&self, id: i64) -> AppResult<Option<AccountProjection>> {
        Ok(self
            .find_account_by_id(id)
            .await?
            .filter(|a| a.has_role(role::TUTOR)))
    }

    /// Register a new account.
    pub async fn register(&self, mut input: RegisterInput) -> AppResult<AccountProjection> {
        input.email = input.email.trim().to_lowercase();
        input.validate()?;

        let email = input.email;
        if self.account_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let requested = if input.roles.is_empty() {
            vec![role::STUDENT.to_string()]
        } else {
            input.roles
        };

        let mut roles = Vec::with_capacity(requested.len());
        for name in &requested {
            if !SELF_ASSIGNABLE_ROLES
                .iter()
                .any(|r| r.eq_ignore_ascii_case(name))
            {
                return Err(AppError::Forbidden(format!(
                    "Role cannot be chosen at registration: {name}"
                )));
            }
            let found = self
                .role_repo
                .find_by_name(name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Role not found: {name}")))?;
            if !roles.iter().any(|r: &role::Model| r.id == found.id) {
                roles.push(found);
            }
        }

        let password_hash = hash_password(&input.password)?;

        let model = account::ActiveModel {
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(email),
            password_hash: Set(password_hash),
            description: Set(input.description),
            affiliation_id: Set(None),
            is_verified: Set(false),
            verified_at: Set(None),
            enabled: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let role_ids: Vec<i32> = roles.iter().map(|r| r.id).collect();
        let account = self
            .account_repo
            .create_with_roles(model, &role_ids, Utc::now())
            .await?;

        tracing::info!(account_id = account.id, "Registered account");

        let mut names: Vec<String> = roles.into_iter().map(|r| r.name).collect();
        names.sort();
        Ok(AccountProjection::from_model(account, names))
    }

    /// Grant a role. Granting never revokes anything; re-granting is a no-op.
    pub async fn grant_role(&self, account_id: i64, role_name: &str) -> AppResult<()> {
        self.account_repo.get_by_id(account_id).await?;

        let found = self
            .role_repo
            .find_by_name(role_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role not found: {role_name}")))?;

        let granted = self.role_repo.grant(account_id, found.id).await?;
        if granted > 0 {
            tracing::info!(account_id, role = %found.name, "Granted role");
        }

        Ok(())
    }

    /// Verify an account on behalf of an administrator.
    pub async fn verify_account(&self, account_id: i64, verifier_id: i64) -> AppResult<()> {
        self.account_repo.get_by_id(account_id).await?;

        if self.account_repo.find_by_id(verifier_id).await?.is_none()
            || !self.role_repo.has_role(verifier_id, role::ADMIN).await?
        {
            return Err(AppError::Forbidden(
                "Only administrators can verify accounts".to_string(),
            ));
        }

        self.verifier_repo
            .record_verification(account_id, verifier_id, Utc::now())
            .await?;

        tracing::info!(account_id, verifier_id, "Verified account");
        Ok(())
    }

    /// IDs of the accounts that verified `account_id`, oldest edge first.
    pub async fn verifiers_of(&self, account_id: i64) -> AppResult<Vec<i64>> {
        Ok(self
            .verifier_repo
            .verifiers_of(account_id)
            .await?
            .into_iter()
            .map(|edge| edge.verifier_id)
            .collect())
    }

    /// Set or clear an account's affiliation.
    pub async fn set_affiliation(
        &self,
        account_id: i64,
        affiliation_id: Option<i64>,
    ) -> AppResult<()> {
        self.account_repo.get_by_id(account_id).await?;

        if let Some(id) = affiliation_id {
            self.affiliation_repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Affiliation not found: {id}")))?;
        }

        self.account_repo
            .set_affiliation(account_id, affiliation_id)
            .await?;
        Ok(())
    }

    /// Remove an account, archiving it instead while messages reference it.
    pub async fn remove_account(&self, id: i64) -> AppResult<AccountRemoval> {
        self.account_repo.get_by_id(id).await?;

        let messages_retained = OwnedRelation::SentMessages.policy() == DeletionPolicy::Retain
            || OwnedRelation::ReceivedMessages.policy() == DeletionPolicy::Retain;

        if messages_retained && self.message_repo.count_by_account(id).await? > 0 {
            self.account_repo.disable(id).await?;
            tracing::info!(account_id = id, "Archived account with retained messages");
            return Ok(AccountRemoval::Archived);
        }

        self.account_repo.delete(id).await?;
        tracing::info!(account_id = id, "Deleted account");
        Ok(AccountRemoval::Deleted)
    }
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}
