//! # Chat Handlers
//!
//! Read access to stored LINE conversations and the endpoint agents use to
//! send a reply back to a customer. Sending pushes the text through the
//! LINE API first and persists it only after the push succeeds, so the
//! stored history never claims a message the customer did not receive.

use super::{wrap_response, ApiResponse, AppError, AppState};
use crate::auth::middleware::AuthenticatedAccount;
use axum::{
    extract::{Path, State},
    Json,
};
use replykit::chat::{self, Chat, ChatMessage};
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
pub struct SendMessagePayload {
    pub text: String,
}

/// The handler for `GET /api/chats`: all chats, most recently active first.
pub async fn list_chats_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(_account): AuthenticatedAccount,
) -> Result<Json<ApiResponse<Vec<Chat>>>, AppError> {
    let chats = chat::list_chats(&app_state.sqlite_provider.db).await?;
    Ok(wrap_response(chats))
}

/// The handler for `GET /api/chats/{id}/messages`.
pub async fn list_chat_messages_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(_account): AuthenticatedAccount,
    Path(chat_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let messages = chat::list_messages(&app_state.sqlite_provider.db, &chat_id).await?;
    Ok(wrap_response(messages))
}

/// The handler for `POST /api/chats/{id}/send`.
pub async fn send_chat_message_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(chat_id): Path<String>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
    if payload.text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Field 'text' must not be empty.".to_string(),
        ));
    }

    let Some(line) = app_state.line.clone() else {
        return Err(AppError::NotConfigured(
            "No LINE channel is configured.".to_string(),
        ));
    };

    let db = &app_state.sqlite_provider.db;
    let chats = chat::list_chats(db).await?;
    let chat = chats
        .into_iter()
        .find(|c| c.id == chat_id)
        .ok_or_else(|| AppError::NotFound(format!("No chat found with id '{chat_id}'")))?;

    line.client
        .push_message(&chat.line_user_id, &payload.text)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("LINE push failed: {e}")))?;

    let message = chat::record_message(db, &chat.id, &payload.text, false).await?;
    info!(owner_id = %account.id, chat_id = %chat.id, "Sent reply to LINE chat");
    Ok(wrap_response(message))
}
