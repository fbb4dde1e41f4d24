//! Meeting endpoints.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use tutorium_common::AppResult;
use tutorium_core::{AccountSummary, ScheduleMeetingInput};
use tutorium_db::entities::meeting;

use crate::{
    extractors::Json,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Create meetings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(schedule_meeting))
        .route(
            "/{id}/participants",
            post(add_participant).get(participants),
        )
}

async fn schedule_meeting(
    State(state): State<AppState>,
    Json(input): Json<ScheduleMeetingInput>,
) -> AppResult<ApiResponse<meeting::Model>> {
    let meeting = state.meeting_service.schedule(input).await?;
    Ok(ApiResponse::created(meeting))
}

/// Add participant request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantRequest {
    pub account_id: i64,
}

async fn add_participant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AddParticipantRequest>,
) -> AppResult<impl IntoResponse> {
    state.meeting_service.add_participant(id, req.account_id).await?;
    Ok(no_content())
}

async fn participants(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<AccountSummary>>> {
    let participants = state.meeting_service.participants(id).await?;
    Ok(ApiResponse::ok(participants))
}
