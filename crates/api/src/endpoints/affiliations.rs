//! Affiliation endpoints.

use axum::{Router, extract::State, routing::post};
use tutorium_common::AppResult;
use tutorium_core::CreateAffiliationInput;
use tutorium_db::entities::affiliation;

use crate::{extractors::Json, middleware::AppState, response::ApiResponse};

/// Create affiliations router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_affiliation))
}

async fn create_affiliation(
    State(state): State<AppState>,
    Json(input): Json<CreateAffiliationInput>,
) -> AppResult<ApiResponse<affiliation::Model>> {
    let affiliation = state.affiliation_service.create_affiliation(input).await?;
    Ok(ApiResponse::created(affiliation))
}
