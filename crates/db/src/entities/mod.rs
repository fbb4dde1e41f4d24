//! Database entities.

#![allow(missing_docs)]

pub mod account;
pub mod account_role;
pub mod account_verifier;
pub mod affiliation;
pub mod chat;
pub mod chat_participant;
pub mod course;
pub mod course_category;
pub mod course_participant;
pub mod course_rating;
pub mod meeting;
pub mod meeting_participant;
pub mod message;
pub mod progress;
pub mod role;
pub mod tutor_rating;

pub use account::Entity as Account;
pub use account_role::Entity as AccountRole;
pub use account_verifier::Entity as AccountVerifier;
pub use affiliation::Entity as Affiliation;
pub use chat::Entity as Chat;
pub use chat_participant::Entity as ChatParticipant;
pub use course::Entity as Course;
pub use course_category::Entity as CourseCategory;
pub use course_participant::Entity as CourseParticipant;
pub use course_rating::Entity as CourseRating;
pub use meeting::Entity as Meeting;
pub use meeting_participant::Entity as MeetingParticipant;
pub use message::Entity as Message;
pub use progress::Entity as Progress;
pub use role::Entity as Role;
pub use tutor_rating::Entity as TutorRating;
