//! Meeting service.

use crate::services::account::AccountSummary;
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Deserialize;
use tutorium_common::{AppError, AppResult};
use tutorium_db::{
    entities::meeting,
    repositories::{AccountRepository, MeetingRepository},
};
use validator::Validate;

/// Input for scheduling a meeting.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMeetingInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    pub starts_at: DateTime<Utc>,

    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: i32,

    /// Room or link.
    #[validate(length(max = 512))]
    pub location: Option<String>,
}

/// Meeting service.
#[derive(Clone)]
pub struct MeetingService {
    meeting_repo: MeetingRepository,
    account_repo: AccountRepository,
}

impl MeetingService {
    /// Create a new meeting service.
    #[must_use]
    pub const fn new(meeting_repo: MeetingRepository, account_repo: AccountRepository) -> Self {
        Self {
            meeting_repo,
            account_repo,
        }
    }

    /// Schedule a meeting.
    pub async fn schedule(&self, input: ScheduleMeetingInput) -> AppResult<meeting::Model> {
        input.validate()?;

        let model = meeting::ActiveModel {
            title: Set(input.title),
            starts_at: Set(input.starts_at.into()),
            duration_minutes: Set(input.duration_minutes),
            location: Set(input.location),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        self.meeting_repo.create(model).await
    }

    /// Add an account to a meeting. Adding it twice changes nothing.
    pub async fn add_participant(&self, meeting_id: i64, account_id: i64) -> AppResult<()> {
        self.meeting_repo
            .find_by_id(meeting_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Meeting not found: {meeting_id}")))?;
        self.account_repo.get_by_id(account_id).await?;

        self.meeting_repo
            .add_participant(meeting_id, account_id)
            .await?;
        Ok(())
    }

    /// Accounts taking part in a meeting.
    pub async fn participants(&self, meeting_id: i64) -> AppResult<Vec<AccountSummary>> {
        let ids = self.meeting_repo.participant_ids(meeting_id).await?;
        let accounts = self.account_repo.find_by_ids(&ids).await?;
        Ok(accounts.into_iter().map(AccountSummary::from).collect())
    }

    /// Meetings an account takes part in, soonest first.
    pub async fn meetings_of(&self, account_id: i64) -> AppResult<Vec<meeting::Model>> {
        self.meeting_repo.find_by_participant(account_id).await
    }
}
