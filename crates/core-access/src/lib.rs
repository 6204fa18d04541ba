//! # Core Access Crate
//!
//! This crate is the central authority for all identity, authentication (AuthN),
//! and authorization (AuthZ) logic for the `replykit` application.
//!
//! Every API request must carry a verifiable identity; there is no guest or
//! anonymous fallback anywhere in the system.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use turso::{Database, Error as TursoError, Row, params};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreAccessError {
    #[error("Database error: {0}")]
    Database(#[from] TursoError),
    #[error("Failed to create or find account for identifier: {0}")]
    AccountPersistenceFailed(String),
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

/// Represents an agent account in the system.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Account {
    /// The unique, deterministic ID of the account (UUIDv5 from an external identifier).
    pub id: String,
    /// The account's role (e.g., 'user', 'root').
    pub role: String,
    /// The timestamp when the account was first created.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Account {
    type Error = CoreAccessError;

    fn try_from(row: &Row) -> std::result::Result<Self, Self::Error> {
        let created_at_str: String = row.get(2)?;
        let created_at =
            chrono::NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
                .map_err(|e| {
                    CoreAccessError::DataIntegrity(format!(
                        "Failed to parse date '{created_at_str}': {e}"
                    ))
                })?;

        Ok(Account {
            id: row.get(0)?,
            role: row.get(1)?,
            created_at,
        })
    }
}

/// Finds an account by its unique identifier (e.g., email or token sub),
/// creating it if it doesn't exist.
///
/// This function creates a deterministic UUIDv5 from the identifier to use as
/// the primary key, ensuring idempotency. The first account ever created
/// becomes root; every later one is a plain user.
pub async fn get_or_create_account(
    db: &Database,
    account_identifier: &str,
) -> Result<Account, CoreAccessError> {
    let conn = db.connect()?;
    let account_id = Uuid::new_v5(&Uuid::NAMESPACE_URL, account_identifier.as_bytes()).to_string();

    // 1. Try to SELECT the account first for maximum compatibility.
    let mut rows = conn
        .query(
            "SELECT id, role, created_at FROM accounts WHERE id = ?",
            params![account_id.clone()],
        )
        .await?;

    if let Some(row) = rows.next().await? {
        return Account::try_from(&row);
    }

    // 2. Account does not exist. The first account becomes root.
    let root_exists = conn
        .query("SELECT 1 FROM accounts WHERE role = 'root' LIMIT 1", ())
        .await?
        .next()
        .await?
        .is_some();
    let role = if root_exists { "user" } else { "root" };

    conn.execute(
        "INSERT INTO accounts (id, role) VALUES (?, ?)",
        params![account_id.clone(), role],
    )
    .await?;

    // 3. SELECT the newly created account to get all fields (like created_at).
    let mut rows = conn
        .query(
            "SELECT id, role, created_at FROM accounts WHERE id = ?",
            params![account_id],
        )
        .await?;

    let row = rows
        .next()
        .await?
        .ok_or_else(|| CoreAccessError::AccountPersistenceFailed(account_identifier.to_string()))?;

    Account::try_from(&row)
}
