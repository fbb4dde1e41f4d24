//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod affiliation;
pub mod chat;
pub mod course;
pub mod course_category;
pub mod event_publisher;
pub mod meeting;
pub mod message;
pub mod ownership;

pub use account::{
    AccountProjection, AccountRemoval, AccountService, AccountSummary, RegisterInput,
    hash_password,
};
pub use affiliation::{AffiliationService, CreateAffiliationInput};
pub use chat::{ChatProjection, ChatService, CreateChatInput};
pub use course::{CourseService, CreateCourseInput};
pub use course_category::{CourseCategoryService, CreateCategoryInput};
pub use event_publisher::{
    EventPublisher, EventPublisherService, KNOWN_TOPICS, MESSAGES_TOPIC, NoOpEventPublisher,
    TopicEvent, is_known_topic,
};
pub use meeting::{MeetingService, ScheduleMeetingInput};
pub use message::{MessageDraft, MessageProjection, MessageService};
pub use ownership::{DeletionPolicy, OwnedRelation, OwnershipService};
