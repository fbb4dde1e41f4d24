//! Chat endpoints.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Serialize;
use tutorium_common::{AppError, AppResult};
use tutorium_core::{ChatProjection, CreateChatInput, MessageProjection};

use crate::{
    extractors::Json,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Create chats router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat-create", post(create_chat))
        .route("/chat-delete/{chat_id}", delete(delete_chat))
        .route("/chats/{chat_id}", get(show_chat))
        .route("/chats/{chat_id}/messages", get(chat_messages))
}

/// Chat creation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCreatedResponse {
    pub chat_id: i64,
    pub message: &'static str,
}

async fn create_chat(
    State(state): State<AppState>,
    Json(input): Json<CreateChatInput>,
) -> AppResult<ApiResponse<ChatCreatedResponse>> {
    let chat_id = state.chat_service.create_chat(input).await?;
    Ok(ApiResponse::created(ChatCreatedResponse {
        chat_id,
        message: "Chat created successfully!",
    }))
}

/// Delete a chat. Its messages stay, detached from the chat.
async fn delete_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    state.chat_service.delete_chat(chat_id).await?;
    Ok(no_content())
}

async fn show_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> AppResult<ApiResponse<ChatProjection>> {
    let chat = state
        .chat_service
        .find_chat(chat_id)
        .await?
        .ok_or(AppError::ChatNotFound(chat_id))?;
    Ok(ApiResponse::ok(chat))
}

/// Messages of a chat, oldest first.
async fn chat_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<MessageProjection>>> {
    let messages = state.message_service.list_chat_messages(chat_id).await?;
    Ok(ApiResponse::ok(messages))
}
