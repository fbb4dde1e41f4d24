//! Shared application state.

#![allow(missing_docs)]

use tutorium_core::{
    AccountService, AffiliationService, ChatService, CourseCategoryService, CourseService,
    MeetingService, MessageService, OwnershipService,
};

use crate::streaming::StreamingState;

/// Application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub message_service: MessageService,
    pub chat_service: ChatService,
    pub course_category_service: CourseCategoryService,
    pub course_service: CourseService,
    pub affiliation_service: AffiliationService,
    pub meeting_service: MeetingService,
    pub ownership_service: OwnershipService,
    pub streaming: StreamingState,
}
