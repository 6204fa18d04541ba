//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds all shared resources, such
//! as the configuration, database connection, instantiated AI provider clients,
//! and the optional LINE channel context, making them accessible to all
//! request handlers.

use crate::config::AppConfig;
use replykit::providers::{
    ai::{open_router::OpenAiCompatProvider, AiProvider},
    db::sqlite::SqliteProvider,
};
use replykit_line::LineClient;
use std::{collections::HashMap, sync::Arc};

/// A fully resolved task configuration with non-optional fields.
#[derive(Clone, Debug)]
pub struct ResolvedTask {
    pub provider: String,
    pub system_prompt: String,
}

/// Everything needed to serve one LINE channel.
#[derive(Clone)]
pub struct LineContext {
    pub channel_secret: String,
    pub client: LineClient,
}

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// A map of fully resolved tasks, ready for use by handlers.
    pub tasks: Arc<HashMap<String, ResolvedTask>>,
    /// The primary database provider for all persistent data.
    pub sqlite_provider: Arc<SqliteProvider>,
    /// A map of instantiated AI providers, keyed by their name from the config.
    pub ai_providers: Arc<HashMap<String, Box<dyn AiProvider>>>,
    /// The LINE channel context, when a channel is configured.
    pub line: Option<Arc<LineContext>>,
}

impl AppState {
    /// Resolves the AI provider and persona for a named task.
    pub fn task_pipeline_parts(&self, task: &str) -> anyhow::Result<(Box<dyn AiProvider>, String)> {
        let resolved = self
            .tasks
            .get(task)
            .ok_or_else(|| anyhow::anyhow!("No task named '{task}' is configured"))?;
        let provider = self
            .ai_providers
            .get(&resolved.provider)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Task '{task}' references unknown provider '{}'",
                    resolved.provider
                )
            })?
            .clone();
        Ok((provider, resolved.system_prompt.clone()))
    }
}

/// Builds the shared application state from the configuration.
///
/// This function initializes all necessary services:
/// - It instantiates an AI provider client for each entry in the `providers`
///   section of the configuration.
/// - It sets up the connection to the SQLite database and its schema.
/// - It builds the LINE client when channel credentials are present.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    // Create a map of AI provider instances from the configuration.
    let mut ai_providers = HashMap::new();
    for (name, provider_config) in &config.providers {
        let provider: Box<dyn AiProvider> = match provider_config.provider.as_str() {
            "openai_compat" => Box::new(OpenAiCompatProvider::new(
                provider_config.api_url.clone(),
                provider_config.api_key.clone(),
                provider_config.model_name.clone(),
            )?),
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported AI provider type '{}' for provider '{}'",
                    provider_config.provider,
                    name
                ));
            }
        };
        ai_providers.insert(name.clone(), provider);
    }

    // Validate and resolve all tasks from the configuration. The default
    // layer guarantees the 'suggestion' task exists; a missing field here
    // means a malformed config file.
    let mut resolved_tasks = HashMap::new();
    for (name, task_config) in &config.tasks {
        let provider = task_config.provider.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'provider' field")
        })?;
        let system_prompt = task_config.system_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'system_prompt' field")
        })?;

        resolved_tasks.insert(
            name.clone(),
            ResolvedTask {
                provider,
                system_prompt,
            },
        );
    }

    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    tracing::info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");
    // Ensure the database schema is up-to-date on startup.
    sqlite_provider.initialize_schema().await?;

    let line = match &config.line {
        Some(line_config) => {
            let client = match &line_config.api_url {
                Some(api_url) => LineClient::with_api_url(
                    line_config.channel_access_token.clone(),
                    api_url.clone(),
                )?,
                None => LineClient::new(line_config.channel_access_token.clone())?,
            };
            tracing::info!("LINE channel configured; webhook endpoint enabled.");
            Some(Arc::new(LineContext {
                channel_secret: line_config.channel_secret.clone(),
                client,
            }))
        }
        None => {
            tracing::info!("No LINE channel configured; webhook endpoint disabled.");
            None
        }
    };

    Ok(AppState {
        config: Arc::new(config),
        tasks: Arc::new(resolved_tasks),
        sqlite_provider: Arc::new(sqlite_provider),
        ai_providers: Arc::new(ai_providers),
        line,
    })
}
