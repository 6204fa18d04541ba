//! # Suggestion Handlers
//!
//! The core endpoint: take an inquiry (and optionally a conversation
//! history), run the suggestion pipeline, and return the structured
//! candidate replies. Also exposes the read side of the experience log.

use super::{wrap_response, ApiResponse, AppError, AppState};
use crate::auth::middleware::AuthenticatedAccount;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use replykit::chat;
use replykit::experience::{ExperienceLogger, ExperienceRecord};
use replykit::types::{AiResponse, ConversationTurn};
use replykit::SuggestionPipeline;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
pub struct SuggestPayload {
    pub inquiry: String,
    /// Prior turns to render into the prompt, oldest first.
    #[serde(default)]
    pub history: Option<Vec<ConversationTurn>>,
    /// When set and `history` is not, the stored messages of this chat are
    /// used as the history.
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// The handler for `POST /api/suggest`.
///
/// Always responds with a well-formed scenarios object. A failed pipeline
/// run responds `500` with the single fallback scenario as the body, so
/// clients can render it like any other result.
pub async fn suggest_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<SuggestPayload>,
) -> Result<(StatusCode, Json<ApiResponse<AiResponse>>), AppError> {
    if payload.inquiry.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Field 'inquiry' must not be empty.".to_string(),
        ));
    }

    let history = match (&payload.history, &payload.chat_id) {
        (Some(history), _) => history.clone(),
        (None, Some(chat_id)) => {
            chat::list_messages(&app_state.sqlite_provider.db, chat_id)
                .await?
                .iter()
                .map(|m| m.as_turn())
                .collect()
        }
        (None, None) => Vec::new(),
    };

    let (provider, persona) = app_state.task_pipeline_parts("suggestion")?;
    let pipeline = SuggestionPipeline::new(provider, app_state.sqlite_provider.db.clone())
        .with_persona(persona);

    info!(owner_id = %account.id, history_turns = history.len(), "Running suggestion pipeline");
    let outcome = pipeline.suggest(&account.id, &payload.inquiry, &history).await;

    let status = if outcome.failure.is_some() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    Ok((status, wrap_response(outcome.response)))
}

#[derive(Deserialize, Default)]
pub struct ExperienceParams {
    pub limit: Option<u32>,
}

/// The handler for `GET /api/experiences`: the caller's past suggestion
/// runs, newest first, optionally capped with `?limit=`.
pub async fn list_experiences_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(params): Query<ExperienceParams>,
) -> Result<Json<ApiResponse<Vec<ExperienceRecord>>>, AppError> {
    let logger = ExperienceLogger::new(app_state.sqlite_provider.db.clone());
    let records = logger.list(&account.id, params.limit).await?;
    Ok(wrap_response(records))
}
