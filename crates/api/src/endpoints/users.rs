//! Account endpoints.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use tutorium_common::{AppError, AppResult};
use tutorium_core::{AccountProjection, AccountRemoval, RegisterInput};
use tutorium_db::entities::meeting;

use crate::{
    extractors::Json,
    middleware::AppState,
    response::{ApiResponse, CountResponse, no_content},
};

/// Create users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/student-count", get(student_count))
        .route("/tutor-count", get(tutor_count))
        .route("/{id}", get(show_user).delete(remove_user))
        .route("/{id}/roles", post(grant_role))
        .route("/{id}/verify", post(verify_user))
        .route("/{id}/affiliation", put(set_affiliation))
        .route("/{id}/meetings", get(meetings))
        .route(
            "/{id}/tutor-ratings/{rating_id}",
            delete(release_tutor_rating),
        )
        .route(
            "/{id}/course-ratings/{rating_id}",
            delete(release_course_rating),
        )
        .route("/{id}/progress/{progress_id}", delete(release_progress))
}

/// Create roles router.
pub fn roles_router() -> Router<AppState> {
    Router::new().route("/{role}/count", get(role_count))
}

/// Create tutors router.
pub fn tutors_router() -> Router<AppState> {
    Router::new().route("/{id}", get(show_tutor))
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<ApiResponse<AccountProjection>> {
    let account = state.account_service.register(input).await?;
    Ok(ApiResponse::created(account))
}

async fn show_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<AccountProjection>> {
    let account = state
        .account_service
        .find_account_by_id(id)
        .await?
        .ok_or(AppError::AccountNotFound(id))?;
    Ok(ApiResponse::ok(account))
}

async fn show_tutor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<AccountProjection>> {
    let tutor = state
        .account_service
        .get_tutor_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tutor not found: {id}")))?;
    Ok(ApiResponse::ok(tutor))
}

async fn student_count(State(state): State<AppState>) -> AppResult<ApiResponse<CountResponse>> {
    let count = state.account_service.student_count().await?;
    Ok(ApiResponse::ok(CountResponse { count }))
}

async fn tutor_count(State(state): State<AppState>) -> AppResult<ApiResponse<CountResponse>> {
    let count = state.account_service.tutor_count().await?;
    Ok(ApiResponse::ok(CountResponse { count }))
}

/// Accounts holding a role. Unknown roles count zero.
async fn role_count(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> AppResult<ApiResponse<CountResponse>> {
    let count = state.account_service.count_by_role(&role).await?;
    Ok(ApiResponse::ok(CountResponse { count }))
}

/// Grant role request.
#[derive(Debug, Deserialize)]
pub struct GrantRoleRequest {
    pub role: String,
}

async fn grant_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<GrantRoleRequest>,
) -> AppResult<impl IntoResponse> {
    state.account_service.grant_role(id, &req.role).await?;
    Ok(no_content())
}

/// Verify account request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub verifier_id: i64,
}

async fn verify_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<VerifyRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .account_service
        .verify_account(id, req.verifier_id)
        .await?;
    Ok(no_content())
}

/// Set affiliation request. `null` clears it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAffiliationRequest {
    pub affiliation_id: Option<i64>,
}

async fn set_affiliation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SetAffiliationRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .account_service
        .set_affiliation(id, req.affiliation_id)
        .await?;
    Ok(no_content())
}

/// Account removal response.
#[derive(Debug, Serialize)]
pub struct RemovalResponse {
    pub removal: &'static str,
}

/// Remove an account. Accounts that messages still reference are archived.
async fn remove_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<RemovalResponse>> {
    let removal = match state.account_service.remove_account(id).await? {
        AccountRemoval::Archived => "archived",
        AccountRemoval::Deleted => "deleted",
    };
    Ok(ApiResponse::ok(RemovalResponse { removal }))
}

async fn meetings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<meeting::Model>>> {
    let meetings = state.meeting_service.meetings_of(id).await?;
    Ok(ApiResponse::ok(meetings))
}

/// Delete a tutor rating given by the student.
async fn release_tutor_rating(
    State(state): State<AppState>,
    Path((id, rating_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    state
        .ownership_service
        .release_tutor_rating(id, rating_id)
        .await?;
    Ok(no_content())
}

/// Delete a course rating given by the student.
async fn release_course_rating(
    State(state): State<AppState>,
    Path((id, rating_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    state
        .ownership_service
        .release_course_rating(id, rating_id)
        .await?;
    Ok(no_content())
}

async fn release_progress(
    State(state): State<AppState>,
    Path((id, progress_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    state
        .ownership_service
        .release_progress(id, progress_id)
        .await?;
    Ok(no_content())
}
