//! Message submission over REST.

use axum::{Router, extract::State, routing::post};
use tutorium_common::AppResult;
use tutorium_core::{MessageDraft, MessageProjection};

use crate::{extractors::Json, middleware::AppState, response::ApiResponse};

/// Create messages router.
pub fn router() -> Router<AppState> {
    Router::new().route("/message/send", post(send_message))
}

/// Persist a message and publish it to the message topic.
///
/// Returns the same projection WebSocket subscribers receive.
async fn send_message(
    State(state): State<AppState>,
    Json(draft): Json<MessageDraft>,
) -> AppResult<ApiResponse<MessageProjection>> {
    let message = state.message_service.save_message(draft).await?;
    Ok(ApiResponse::ok(message))
}
