//! # SQLite Schema
//!
//! Centralizes the table-creation statements so the schema lives in one
//! place. Every statement is idempotent (`IF NOT EXISTS`) and safe to run
//! on each application startup.
//!
//! Every reference table carries an `owner_id`; accessors always filter on
//! it, which is what enforces per-account isolation. `experience_log` is
//! append-only: no UPDATE or DELETE statement for it exists anywhere in
//! this crate.

pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS manuals (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS scenarios (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        title TEXT NOT NULL,
        prompt TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS precedents (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        inquiry TEXT NOT NULL,
        response TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS experience_log (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        inquiry TEXT NOT NULL,
        response TEXT NOT NULL,
        manuals TEXT NOT NULL,
        products TEXT NOT NULL,
        scenarios TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS chats (
        id TEXT PRIMARY KEY,
        line_user_id TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        chat_id TEXT NOT NULL,
        text TEXT NOT NULL,
        is_from_user INTEGER NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE INDEX IF NOT EXISTS idx_manuals_owner ON manuals (owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_owner ON products (owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_scenarios_owner ON scenarios (owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_precedents_owner ON precedents (owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_experience_owner ON experience_log (owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_chat ON messages (chat_id)",
];
