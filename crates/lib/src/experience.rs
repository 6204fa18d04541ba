//! # Experience Log
//!
//! Append-only record of every suggestion run: the inquiry, the full
//! structured response, and a snapshot of the reference data that shaped
//! the prompt. Logging is best-effort and never blocks or fails the
//! request that produced the suggestion.

use crate::errors::PromptError;
use crate::types::{parse_sqlite_timestamp, AiResponse, ReferenceSets};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use turso::{params, Database, Row};
use uuid::Uuid;

fn connection_err(e: impl ToString) -> PromptError {
    PromptError::StorageConnection(e.to_string())
}

fn operation_err(e: impl ToString) -> PromptError {
    PromptError::StorageOperationFailed(e.to_string())
}

/// One stored suggestion run, as returned by [`ExperienceLogger::list`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: String,
    pub inquiry: String,
    /// The full [`AiResponse`] the run produced, including fallbacks.
    pub response: AiResponse,
    /// Manual contents in effect at suggestion time.
    pub manuals: Vec<String>,
    /// Product contents in effect at suggestion time.
    pub products: Vec<String>,
    /// Scenario titles in effect at suggestion time.
    pub scenarios: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Writes and reads the append-only experience log.
#[derive(Debug, Clone)]
pub struct ExperienceLogger {
    db: Database,
}

impl ExperienceLogger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Appends one run to the log.
    ///
    /// The reference snapshot stores what the prompt actually consumed:
    /// manual and product contents and scenario titles, each serialized as
    /// a JSON string array.
    pub async fn record(
        &self,
        owner_id: &str,
        inquiry: &str,
        response: &AiResponse,
        sets: &ReferenceSets,
    ) -> Result<(), PromptError> {
        if owner_id.trim().is_empty() {
            return Err(PromptError::MissingField("owner_id"));
        }

        let response_json = serde_json::to_string(response)?;
        let manuals: Vec<&str> = sets.manuals.iter().map(|m| m.content.as_str()).collect();
        let products: Vec<&str> = sets.products.iter().map(|p| p.content.as_str()).collect();
        let scenarios: Vec<&str> = sets.scenarios.iter().map(|s| s.title.as_str()).collect();

        let conn = self.db.connect().map_err(connection_err)?;
        conn.execute(
            "INSERT INTO experience_log (id, owner_id, inquiry, response, manuals, products, scenarios)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                Uuid::new_v4().to_string(),
                owner_id,
                inquiry,
                response_json,
                serde_json::to_string(&manuals)?,
                serde_json::to_string(&products)?,
                serde_json::to_string(&scenarios)?
            ],
        )
        .await
        .map_err(operation_err)?;
        Ok(())
    }

    /// Fire-and-forget variant of [`record`](Self::record).
    ///
    /// Spawns the write onto the runtime so the caller can respond without
    /// waiting for it. A failed write is logged and dropped; it must never
    /// surface to the request that produced the suggestion.
    pub fn spawn_record(
        &self,
        owner_id: String,
        inquiry: String,
        response: AiResponse,
        sets: ReferenceSets,
    ) {
        let logger = self.clone();
        tokio::spawn(async move {
            if let Err(e) = logger.record(&owner_id, &inquiry, &response, &sets).await {
                warn!(error = %e, "failed to record experience log entry");
            }
        });
    }

    /// Lists an owner's runs, newest first. `limit` caps the result; `None`
    /// returns everything.
    pub async fn list(
        &self,
        owner_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ExperienceRecord>, PromptError> {
        let conn = self.db.connect().map_err(connection_err)?;
        // SQLite treats a negative LIMIT as unlimited.
        let limit = limit.map(i64::from).unwrap_or(-1);
        let mut rows = conn
            .query(
                "SELECT id, inquiry, response, manuals, products, scenarios, created_at
                 FROM experience_log WHERE owner_id = ?
                 ORDER BY created_at DESC, id
                 LIMIT ?",
                params![owner_id, limit],
            )
            .await
            .map_err(operation_err)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await.map_err(operation_err)? {
            records.push(Self::record_from_row(&row)?);
        }
        Ok(records)
    }

    fn record_from_row(row: &Row) -> Result<ExperienceRecord, PromptError> {
        let response_json: String = row.get(2).map_err(operation_err)?;
        let manuals_json: String = row.get(3).map_err(operation_err)?;
        let products_json: String = row.get(4).map_err(operation_err)?;
        let scenarios_json: String = row.get(5).map_err(operation_err)?;
        let created_at: String = row.get(6).map_err(operation_err)?;

        Ok(ExperienceRecord {
            id: row.get(0).map_err(operation_err)?,
            inquiry: row.get(1).map_err(operation_err)?,
            response: serde_json::from_str(&response_json)?,
            manuals: serde_json::from_str(&manuals_json)?,
            products: serde_json::from_str(&products_json)?,
            scenarios: serde_json::from_str(&scenarios_json)?,
            created_at: parse_sqlite_timestamp(&created_at)?,
        })
    }
}
