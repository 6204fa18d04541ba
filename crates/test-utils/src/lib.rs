//! Shared test doubles for the replykit crates: an isolated in-memory
//! database with the full application schema, and a scriptable AI provider
//! that records every prompt it receives.

use anyhow::Result;
use async_trait::async_trait;
use replykit::errors::PromptError;
use replykit::providers::ai::AiProvider;
use replykit::providers::db::sqlite::sql::ALL_TABLE_CREATION_SQL;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use turso::Database;

/// An isolated in-memory database carrying the full application schema.
///
/// Every call to [`TestSetup::new`] builds a fresh database, so tests never
/// observe each other's rows. Clone `db` to hand the same database to
/// multiple components under test.
pub struct TestSetup {
    pub db: Database,
}

impl TestSetup {
    pub async fn new() -> Result<Self> {
        let db = turso::Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;
        for statement in ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        Ok(Self { db })
    }
}

/// One prompt pair the mock provider was asked to complete.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
}

/// A scriptable [`AiProvider`] for pipeline tests.
///
/// Responses are keyed by substring: the first programmed key found in
/// either the system or the user prompt wins. An unmatched call fails with
/// [`PromptError::AiApi`], which doubles as the upstream-failure case.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs the completion returned when `key` appears in a prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), response.to_string());
    }

    /// Every prompt pair this provider has been asked to complete, in order.
    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system_prompt.to_string(),
            user: user_prompt.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if system_prompt.contains(key) || user_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: no response programmed for this prompt. System prompt was: '{system_prompt}'"
        )))
    }
}
