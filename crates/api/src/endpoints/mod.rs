//! API endpoints.

mod affiliations;
mod categories;
mod chats;
mod courses;
mod meetings;
mod messages;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(messages::router())
        .merge(chats::router())
        .nest("/users", users::router())
        .nest("/roles", users::roles_router())
        .nest("/tutors", users::tutors_router())
        .nest("/categories", categories::router())
        .nest("/affiliations", affiliations::router())
        .nest("/courses", courses::router())
        .nest("/meetings", meetings::router())
}
