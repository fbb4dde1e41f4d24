//! Repositories wrapping the sea-orm entities.

mod account;
mod affiliation;
mod chat;
mod course;
mod course_category;
mod meeting;
mod message;
mod progress;
mod rating;
mod role;
mod verifier;

pub use account::AccountRepository;
pub use affiliation::AffiliationRepository;
pub use chat::ChatRepository;
pub use course::CourseRepository;
pub use course_category::CourseCategoryRepository;
pub use meeting::MeetingRepository;
pub use message::MessageRepository;
pub use progress::ProgressRepository;
pub use rating::RatingRepository;
pub use role::RoleRepository;
pub use verifier::VerifierRepository;
