//! Deletion policy per relationship.
//!
//! Every relationship that can outlive one of its ends is tagged with either
//! `Cascade` (the dependent rows go with the owner) or `Retain` (the dependent
//! rows stay and lose their reference). The schema's foreign keys carry the
//! same policies; the functions here apply them to single rows.

use tutorium_common::{AppError, AppResult};
use tutorium_db::repositories::{MessageRepository, ProgressRepository, RatingRepository};

/// What happens to dependent rows when their owner goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPolicy {
    /// Dependent rows are deleted, including when they are disassociated.
    Cascade,
    /// Dependent rows are kept for archival.
    Retain,
}

/// Relationships with an explicit deletion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedRelation {
    /// Account to the tutor ratings it gave.
    TutorRatingsGiven,
    /// Account to the tutor ratings it received.
    TutorRatingsReceived,
    /// Account to the course ratings it gave.
    CourseRatingsGiven,
    /// Account to its progress records.
    Progress,
    /// Account to the messages it sent.
    SentMessages,
    /// Account to the messages it received.
    ReceivedMessages,
    /// Chat to its messages.
    ChatMessages,
    /// Chat to its participant rows.
    ChatParticipants,
}

impl OwnedRelation {
    /// Every tagged relationship.
    pub const ALL: [Self; 8] = [
        Self::TutorRatingsGiven,
        Self::TutorRatingsReceived,
        Self::CourseRatingsGiven,
        Self::Progress,
        Self::SentMessages,
        Self::ReceivedMessages,
        Self::ChatMessages,
        Self::ChatParticipants,
    ];

    /// Deletion policy of this relationship.
    #[must_use]
    pub const fn policy(self) -> DeletionPolicy {
        match self {
            Self::TutorRatingsGiven
            | Self::TutorRatingsReceived
            | Self::CourseRatingsGiven
            | Self::Progress
            | Self::ChatParticipants => DeletionPolicy::Cascade,
            Self::SentMessages | Self::ReceivedMessages | Self::ChatMessages => {
                DeletionPolicy::Retain
            }
        }
    }
}

/// Applies the per-relationship policies to individual rows.
#[derive(Clone)]
pub struct OwnershipService {
    rating_repo: RatingRepository,
    progress_repo: ProgressRepository,
    message_repo: MessageRepository,
}

impl OwnershipService {
    /// Create a new ownership service.
    #[must_use]
    pub const fn new(
        rating_repo: RatingRepository,
        progress_repo: ProgressRepository,
        message_repo: MessageRepository,
    ) -> Self {
        Self {
            rating_repo,
            progress_repo,
            message_repo,
        }
    }

    /// Remove a tutor rating from the student who gave it. The row is deleted.
    pub async fn release_tutor_rating(&self, student_id: i64, rating_id: i64) -> AppResult<()> {
        let deleted = self
            .rating_repo
            .delete_tutor_rating_owned_by(student_id, rating_id)
            .await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "Tutor rating {rating_id} not owned by account {student_id}"
            )));
        }
        Ok(())
    }

    /// Remove a course rating from the student who gave it. The row is deleted.
    pub async fn release_course_rating(&self, student_id: i64, rating_id: i64) -> AppResult<()> {
        let deleted = self
            .rating_repo
            .delete_course_rating_owned_by(student_id, rating_id)
            .await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "Course rating {rating_id} not owned by account {student_id}"
            )));
        }
        Ok(())
    }

    /// Remove a progress record from its student. The row is deleted.
    pub async fn release_progress(&self, student_id: i64, progress_id: i64) -> AppResult<()> {
        let deleted = self
            .progress_repo
            .delete_owned_by(student_id, progress_id)
            .await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "Progress {progress_id} not owned by account {student_id}"
            )));
        }
        Ok(())
    }

    /// Detach every message from a chat, keeping the rows. Returns how many moved.
    pub async fn detach_chat_messages(&self, chat_id: i64) -> AppResult<u64> {
        self.message_repo.detach_from_chat(chat_id).await
    }
}
