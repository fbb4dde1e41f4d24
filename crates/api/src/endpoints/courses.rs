//! Course endpoints.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tutorium_common::AppResult;
use tutorium_core::{AccountSummary, CreateCourseInput};
use tutorium_db::entities::course;

use crate::{
    extractors::Json,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Create courses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course))
        .route("/{id}/enroll", post(enroll))
        .route("/{id}/participants", get(participants))
}

async fn create_course(
    State(state): State<AppState>,
    Json(input): Json<CreateCourseInput>,
) -> AppResult<ApiResponse<course::Model>> {
    let course = state.course_service.create_course(input).await?;
    Ok(ApiResponse::created(course))
}

/// Enroll request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub account_id: i64,
}

/// Enroll an account. Enrolling twice is a no-op.
async fn enroll(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EnrollRequest>,
) -> AppResult<impl IntoResponse> {
    state.course_service.enroll(id, req.account_id).await?;
    Ok(no_content())
}

async fn participants(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<AccountSummary>>> {
    let participants = state.course_service.participants(id).await?;
    Ok(ApiResponse::ok(participants))
}
