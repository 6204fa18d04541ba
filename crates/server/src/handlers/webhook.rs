//! # LINE Webhook Handler
//!
//! Receives webhook deliveries from the LINE platform, verifies their
//! signature against the raw body bytes, and stores incoming text messages
//! into the chat tables.
//!
//! Status contract:
//! - empty body: `200` before any signature check (LINE endpoint
//!   verification)
//! - invalid or missing signature: `400`, nothing is persisted
//! - any internal failure while processing events: `200`, so LINE does not
//!   retry deliveries the service cannot handle

use crate::state::{AppState, LineContext};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use replykit::chat;
use replykit_line::{verify_signature, WebhookEvent, WebhookRequest};
use tracing::{error, info, warn};

const SIGNATURE_HEADER: &str = "x-line-signature";

/// The handler for `POST /webhook/line`.
pub async fn line_webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let Some(line) = app_state.line.clone() else {
        warn!("Received LINE webhook delivery but no channel is configured.");
        return StatusCode::SERVICE_UNAVAILABLE;
    };

    if body.is_empty() {
        // Endpoint verification ping, acknowledged before signature checks.
        return StatusCode::OK;
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match verify_signature(&line.channel_secret, &body, signature) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Rejected LINE webhook delivery with a bad signature.");
            return StatusCode::BAD_REQUEST;
        }
        Err(e) => {
            error!("LINE signature verification failed: {e}");
            return StatusCode::BAD_REQUEST;
        }
    }

    let request: WebhookRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            // Signed but unparseable; acknowledge so LINE does not retry.
            warn!("Could not parse LINE webhook body: {e}");
            return StatusCode::OK;
        }
    };

    for event in &request.events {
        if let Err(e) = process_event(&app_state, &line, event).await {
            error!("Failed to process LINE webhook event: {e:?}");
        }
    }

    StatusCode::OK
}

/// Stores one incoming text message. Non-message and non-text events are
/// ignored.
async fn process_event(
    app_state: &AppState,
    line: &LineContext,
    event: &WebhookEvent,
) -> anyhow::Result<()> {
    if event.event_type != "message" {
        return Ok(());
    }
    let Some(message) = &event.message else {
        return Ok(());
    };
    if message.message_type != "text" {
        return Ok(());
    }
    let Some(text) = &message.text else {
        return Ok(());
    };
    let Some(user_id) = event.source.as_ref().and_then(|s| s.user_id.as_deref()) else {
        anyhow::bail!("message event carried no source user id");
    };

    // Profile lookup failures fall back to the raw user id so a transient
    // LINE API error never drops a customer message.
    let display_name = match line.client.get_profile(user_id).await {
        Ok(profile) => profile.display_name,
        Err(e) => {
            warn!("Could not fetch LINE profile for '{user_id}': {e}");
            user_id.to_string()
        }
    };

    let db = &app_state.sqlite_provider.db;
    let chat = chat::get_or_create_chat(db, user_id, &display_name).await?;
    chat::record_message(db, &chat.id, text, true).await?;
    info!(chat_id = %chat.id, "Stored incoming LINE message");
    Ok(())
}
