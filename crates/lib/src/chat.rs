//! # Messaging-Channel Chat Storage
//!
//! Persists one chat row per messaging-channel user plus the message
//! history used to rebuild conversation transcripts for the prompt
//! composer.

use crate::errors::PromptError;
use crate::types::{parse_sqlite_timestamp, ConversationTurn};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use turso::{params, Database, Row};
use uuid::Uuid;

fn connection_err(e: impl ToString) -> PromptError {
    PromptError::StorageConnection(e.to_string())
}

fn operation_err(e: impl ToString) -> PromptError {
    PromptError::StorageOperationFailed(e.to_string())
}

/// One conversation with a messaging-channel user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    /// The channel-side user identifier the chat is keyed on.
    pub line_user_id: String,
    pub display_name: String,
    pub updated_at: DateTime<Utc>,
}

/// One stored message inside a chat, from either side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub text: String,
    pub is_from_user: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Projects a stored message into the composer's transcript shape.
    pub fn as_turn(&self) -> ConversationTurn {
        ConversationTurn {
            from_user: self.is_from_user,
            text: self.text.clone(),
            timestamp: Some(self.created_at),
        }
    }
}

fn chat_from_row(row: &Row) -> Result<Chat, PromptError> {
    let updated_at: String = row.get(3).map_err(operation_err)?;
    Ok(Chat {
        id: row.get(0).map_err(operation_err)?,
        line_user_id: row.get(1).map_err(operation_err)?,
        display_name: row.get(2).map_err(operation_err)?,
        updated_at: parse_sqlite_timestamp(&updated_at)?,
    })
}

fn message_from_row(row: &Row) -> Result<ChatMessage, PromptError> {
    let is_from_user: i64 = row.get(3).map_err(operation_err)?;
    let created_at: String = row.get(4).map_err(operation_err)?;
    Ok(ChatMessage {
        id: row.get(0).map_err(operation_err)?,
        chat_id: row.get(1).map_err(operation_err)?,
        text: row.get(2).map_err(operation_err)?,
        is_from_user: is_from_user != 0,
        created_at: parse_sqlite_timestamp(&created_at)?,
    })
}

/// Finds the chat keyed on `line_user_id`, creating it on first contact.
///
/// The display name is refreshed on every call so a renamed user shows up
/// under their current name.
pub async fn get_or_create_chat(
    db: &Database,
    line_user_id: &str,
    display_name: &str,
) -> Result<Chat, PromptError> {
    let conn = db.connect().map_err(connection_err)?;

    let mut rows = conn
        .query(
            "SELECT id, line_user_id, display_name, updated_at FROM chats WHERE line_user_id = ?",
            params![line_user_id],
        )
        .await
        .map_err(operation_err)?;

    if let Some(row) = rows.next().await.map_err(operation_err)? {
        let chat = chat_from_row(&row)?;
        if chat.display_name != display_name {
            conn.execute(
                "UPDATE chats SET display_name = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                params![display_name, chat.id.clone()],
            )
            .await
            .map_err(operation_err)?;
        }
        return Ok(Chat {
            display_name: display_name.to_string(),
            ..chat
        });
    }

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO chats (id, line_user_id, display_name) VALUES (?, ?, ?)",
        params![id.clone(), line_user_id, display_name],
    )
    .await
    .map_err(operation_err)?;

    let mut rows = conn
        .query(
            "SELECT id, line_user_id, display_name, updated_at FROM chats WHERE id = ?",
            params![id.clone()],
        )
        .await
        .map_err(operation_err)?;
    let row = rows
        .next()
        .await
        .map_err(operation_err)?
        .ok_or_else(|| PromptError::DataIntegrity(format!("chat '{id}' vanished after insert")))?;
    chat_from_row(&row)
}

/// Appends one message to a chat and bumps the chat's activity timestamp.
pub async fn record_message(
    db: &Database,
    chat_id: &str,
    text: &str,
    is_from_user: bool,
) -> Result<ChatMessage, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO messages (id, chat_id, text, is_from_user) VALUES (?, ?, ?, ?)",
        params![id.clone(), chat_id, text, i64::from(is_from_user)],
    )
    .await
    .map_err(operation_err)?;

    conn.execute(
        "UPDATE chats SET updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        params![chat_id],
    )
    .await
    .map_err(operation_err)?;

    let mut rows = conn
        .query(
            "SELECT id, chat_id, text, is_from_user, created_at FROM messages WHERE id = ?",
            params![id.clone()],
        )
        .await
        .map_err(operation_err)?;
    let row = rows
        .next()
        .await
        .map_err(operation_err)?
        .ok_or_else(|| PromptError::DataIntegrity(format!("message '{id}' vanished after insert")))?;
    message_from_row(&row)
}

/// Lists chats most recently active first.
pub async fn list_chats(db: &Database) -> Result<Vec<Chat>, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let mut rows = conn
        .query(
            "SELECT id, line_user_id, display_name, updated_at FROM chats
             ORDER BY updated_at DESC, id",
            (),
        )
        .await
        .map_err(operation_err)?;

    let mut chats = Vec::new();
    while let Some(row) = rows.next().await.map_err(operation_err)? {
        chats.push(chat_from_row(&row)?);
    }
    Ok(chats)
}

/// Lists a chat's messages in chronological order.
pub async fn list_messages(db: &Database, chat_id: &str) -> Result<Vec<ChatMessage>, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let mut rows = conn
        .query(
            "SELECT id, chat_id, text, is_from_user, created_at FROM messages
             WHERE chat_id = ? ORDER BY created_at, id",
            params![chat_id],
        )
        .await
        .map_err(operation_err)?;

    let mut messages = Vec::new();
    while let Some(row) = rows.next().await.map_err(operation_err)? {
        messages.push(message_from_row(&row)?);
    }
    Ok(messages)
}
