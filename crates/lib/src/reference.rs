//! # Reference Data Accessors
//!
//! Owner-scoped reads and writes for the four reference-record kinds the
//! prompt composer consumes: manuals, products, scenarios, precedents.
//!
//! Isolation rule: every query filters on `owner_id`. A record created
//! under one account is never visible to, or deletable by, another.

use crate::errors::PromptError;
use crate::types::{
    parse_sqlite_timestamp, ManualEntry, PrecedentEntry, ProductEntry, ReferenceSets,
    ScenarioEntry,
};
use turso::{params, Database, Row};
use uuid::Uuid;

fn connection_err(e: impl ToString) -> PromptError {
    PromptError::StorageConnection(e.to_string())
}

fn operation_err(e: impl ToString) -> PromptError {
    PromptError::StorageOperationFailed(e.to_string())
}

impl ReferenceSets {
    /// Loads all four reference sets for one pipeline run.
    pub async fn fetch(db: &Database, owner_id: &str) -> Result<Self, PromptError> {
        Ok(Self {
            manuals: list_manuals(db, owner_id).await?,
            products: list_products(db, owner_id).await?,
            scenarios: list_scenarios(db, owner_id).await?,
            precedents: list_precedents(db, owner_id).await?,
        })
    }
}

// --- Manuals ---

fn manual_from_row(row: &Row) -> Result<ManualEntry, PromptError> {
    let created_at: String = row.get(2).map_err(operation_err)?;
    let updated_at: String = row.get(3).map_err(operation_err)?;
    Ok(ManualEntry {
        id: row.get(0).map_err(operation_err)?,
        content: row.get(1).map_err(operation_err)?,
        created_at: parse_sqlite_timestamp(&created_at)?,
        updated_at: parse_sqlite_timestamp(&updated_at)?,
    })
}

pub async fn list_manuals(db: &Database, owner_id: &str) -> Result<Vec<ManualEntry>, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let mut rows = conn
        .query(
            "SELECT id, content, created_at, updated_at FROM manuals
             WHERE owner_id = ? ORDER BY created_at, id",
            params![owner_id],
        )
        .await
        .map_err(operation_err)?;

    let mut manuals = Vec::new();
    while let Some(row) = rows.next().await.map_err(operation_err)? {
        manuals.push(manual_from_row(&row)?);
    }
    Ok(manuals)
}

pub async fn add_manual(
    db: &Database,
    owner_id: &str,
    content: &str,
) -> Result<ManualEntry, PromptError> {
    if content.trim().is_empty() {
        return Err(PromptError::MissingField("content"));
    }
    let conn = db.connect().map_err(connection_err)?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO manuals (id, owner_id, content) VALUES (?, ?, ?)",
        params![id.clone(), owner_id, content],
    )
    .await
    .map_err(operation_err)?;

    fetch_manual(&conn, &id).await
}

async fn fetch_manual(conn: &turso::Connection, id: &str) -> Result<ManualEntry, PromptError> {
    let mut rows = conn
        .query(
            "SELECT id, content, created_at, updated_at FROM manuals WHERE id = ?",
            params![id],
        )
        .await
        .map_err(operation_err)?;
    let row = rows
        .next()
        .await
        .map_err(operation_err)?
        .ok_or_else(|| PromptError::DataIntegrity(format!("manual '{id}' vanished after insert")))?;
    manual_from_row(&row)
}

/// Deletes a manual by id, scoped to the owner. Returns whether a row was
/// removed; a foreign or unknown id is a no-op.
pub async fn delete_manual(db: &Database, owner_id: &str, id: &str) -> Result<bool, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let affected = conn
        .execute(
            "DELETE FROM manuals WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )
        .await
        .map_err(operation_err)?;
    Ok(affected > 0)
}

// --- Products ---

fn product_from_row(row: &Row) -> Result<ProductEntry, PromptError> {
    let created_at: String = row.get(2).map_err(operation_err)?;
    let updated_at: String = row.get(3).map_err(operation_err)?;
    Ok(ProductEntry {
        id: row.get(0).map_err(operation_err)?,
        content: row.get(1).map_err(operation_err)?,
        created_at: parse_sqlite_timestamp(&created_at)?,
        updated_at: parse_sqlite_timestamp(&updated_at)?,
    })
}

pub async fn list_products(db: &Database, owner_id: &str) -> Result<Vec<ProductEntry>, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let mut rows = conn
        .query(
            "SELECT id, content, created_at, updated_at FROM products
             WHERE owner_id = ? ORDER BY created_at, id",
            params![owner_id],
        )
        .await
        .map_err(operation_err)?;

    let mut products = Vec::new();
    while let Some(row) = rows.next().await.map_err(operation_err)? {
        products.push(product_from_row(&row)?);
    }
    Ok(products)
}

pub async fn add_product(
    db: &Database,
    owner_id: &str,
    content: &str,
) -> Result<ProductEntry, PromptError> {
    if content.trim().is_empty() {
        return Err(PromptError::MissingField("content"));
    }
    let conn = db.connect().map_err(connection_err)?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO products (id, owner_id, content) VALUES (?, ?, ?)",
        params![id.clone(), owner_id, content],
    )
    .await
    .map_err(operation_err)?;

    let mut rows = conn
        .query(
            "SELECT id, content, created_at, updated_at FROM products WHERE id = ?",
            params![id.clone()],
        )
        .await
        .map_err(operation_err)?;
    let row = rows
        .next()
        .await
        .map_err(operation_err)?
        .ok_or_else(|| PromptError::DataIntegrity(format!("product '{id}' vanished after insert")))?;
    product_from_row(&row)
}

pub async fn delete_product(db: &Database, owner_id: &str, id: &str) -> Result<bool, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let affected = conn
        .execute(
            "DELETE FROM products WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )
        .await
        .map_err(operation_err)?;
    Ok(affected > 0)
}

// --- Scenarios ---

fn scenario_from_row(row: &Row) -> Result<ScenarioEntry, PromptError> {
    let created_at: String = row.get(3).map_err(operation_err)?;
    let updated_at: String = row.get(4).map_err(operation_err)?;
    Ok(ScenarioEntry {
        id: row.get(0).map_err(operation_err)?,
        title: row.get(1).map_err(operation_err)?,
        prompt: row.get(2).map_err(operation_err)?,
        created_at: parse_sqlite_timestamp(&created_at)?,
        updated_at: parse_sqlite_timestamp(&updated_at)?,
    })
}

pub async fn list_scenarios(
    db: &Database,
    owner_id: &str,
) -> Result<Vec<ScenarioEntry>, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let mut rows = conn
        .query(
            "SELECT id, title, prompt, created_at, updated_at FROM scenarios
             WHERE owner_id = ? ORDER BY created_at, id",
            params![owner_id],
        )
        .await
        .map_err(operation_err)?;

    let mut scenarios = Vec::new();
    while let Some(row) = rows.next().await.map_err(operation_err)? {
        scenarios.push(scenario_from_row(&row)?);
    }
    Ok(scenarios)
}

pub async fn add_scenario(
    db: &Database,
    owner_id: &str,
    title: &str,
    prompt: &str,
) -> Result<ScenarioEntry, PromptError> {
    if title.trim().is_empty() {
        return Err(PromptError::MissingField("title"));
    }
    if prompt.trim().is_empty() {
        return Err(PromptError::MissingField("prompt"));
    }
    let conn = db.connect().map_err(connection_err)?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO scenarios (id, owner_id, title, prompt) VALUES (?, ?, ?, ?)",
        params![id.clone(), owner_id, title, prompt],
    )
    .await
    .map_err(operation_err)?;

    let mut rows = conn
        .query(
            "SELECT id, title, prompt, created_at, updated_at FROM scenarios WHERE id = ?",
            params![id.clone()],
        )
        .await
        .map_err(operation_err)?;
    let row = rows
        .next()
        .await
        .map_err(operation_err)?
        .ok_or_else(|| PromptError::DataIntegrity(format!("scenario '{id}' vanished after insert")))?;
    scenario_from_row(&row)
}

pub async fn delete_scenario(db: &Database, owner_id: &str, id: &str) -> Result<bool, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let affected = conn
        .execute(
            "DELETE FROM scenarios WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )
        .await
        .map_err(operation_err)?;
    Ok(affected > 0)
}

// --- Precedents ---

fn precedent_from_row(row: &Row) -> Result<PrecedentEntry, PromptError> {
    let created_at: String = row.get(3).map_err(operation_err)?;
    let updated_at: String = row.get(4).map_err(operation_err)?;
    Ok(PrecedentEntry {
        id: row.get(0).map_err(operation_err)?,
        inquiry: row.get(1).map_err(operation_err)?,
        response: row.get(2).map_err(operation_err)?,
        created_at: parse_sqlite_timestamp(&created_at)?,
        updated_at: parse_sqlite_timestamp(&updated_at)?,
    })
}

pub async fn list_precedents(
    db: &Database,
    owner_id: &str,
) -> Result<Vec<PrecedentEntry>, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let mut rows = conn
        .query(
            "SELECT id, inquiry, response, created_at, updated_at FROM precedents
             WHERE owner_id = ? ORDER BY created_at, id",
            params![owner_id],
        )
        .await
        .map_err(operation_err)?;

    let mut precedents = Vec::new();
    while let Some(row) = rows.next().await.map_err(operation_err)? {
        precedents.push(precedent_from_row(&row)?);
    }
    Ok(precedents)
}

/// Adds a past Q&A pair. Both halves are validated here, at the accessor
/// boundary, instead of storing a loosely-typed content blob.
pub async fn add_precedent(
    db: &Database,
    owner_id: &str,
    inquiry: &str,
    response: &str,
) -> Result<PrecedentEntry, PromptError> {
    if inquiry.trim().is_empty() {
        return Err(PromptError::MissingField("inquiry"));
    }
    if response.trim().is_empty() {
        return Err(PromptError::MissingField("response"));
    }
    let conn = db.connect().map_err(connection_err)?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO precedents (id, owner_id, inquiry, response) VALUES (?, ?, ?, ?)",
        params![id.clone(), owner_id, inquiry, response],
    )
    .await
    .map_err(operation_err)?;

    let mut rows = conn
        .query(
            "SELECT id, inquiry, response, created_at, updated_at FROM precedents WHERE id = ?",
            params![id.clone()],
        )
        .await
        .map_err(operation_err)?;
    let row = rows
        .next()
        .await
        .map_err(operation_err)?
        .ok_or_else(|| {
            PromptError::DataIntegrity(format!("precedent '{id}' vanished after insert"))
        })?;
    precedent_from_row(&row)
}

pub async fn delete_precedent(db: &Database, owner_id: &str, id: &str) -> Result<bool, PromptError> {
    let conn = db.connect().map_err(connection_err)?;
    let affected = conn
        .execute(
            "DELETE FROM precedents WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )
        .await
        .map_err(operation_err)?;
    Ok(affected > 0)
}
