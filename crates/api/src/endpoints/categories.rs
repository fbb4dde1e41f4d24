//! Course category endpoints.

use axum::{Router, extract::State, routing::get};
use tutorium_common::AppResult;
use tutorium_core::CreateCategoryInput;
use tutorium_db::entities::course_category;

use crate::{extractors::Json, middleware::AppState, response::ApiResponse};

/// Create categories router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories).post(create_category))
}

async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<ApiResponse<course_category::Model>> {
    let category = state.course_category_service.create_category(input).await?;
    Ok(ApiResponse::created(category))
}

async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<course_category::Model>>> {
    let categories = state.course_category_service.list_categories().await?;
    Ok(ApiResponse::ok(categories))
}
