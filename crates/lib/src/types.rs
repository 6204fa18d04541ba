//! # Core Types
//!
//! Shared value types for the suggestion pipeline: the structured AI
//! response contract and the four kinds of owner-scoped reference records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PromptError;

/// The emotional tone attached to a suggested reply.
///
/// The wire contract is a closed three-value enum. Any other value coming
/// back from the model is a contract violation and fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// One candidate reply produced for an inquiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSuggestion {
    /// The reply text the agent can send as-is or edit.
    pub reply: String,
    /// The title of the predefined scenario this instantiates, or an
    /// AI-proposed label for novel suggestions.
    #[serde(rename = "scenarioType")]
    pub scenario_type: String,
    /// Why this scenario is (or is not) a good fit.
    pub notes: String,
    pub sentiment: Sentiment,
}

/// The structured result of one pipeline run.
///
/// Non-empty on success; on any failure it contains exactly one synthetic
/// scenario describing the failure (see [`crate::validator`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub scenarios: Vec<ScenarioSuggestion>,
}

/// A free-text rule the model must obey verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntry {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product description included verbatim as context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named response template the model must instantiate at least once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A past inquiry/response pair used as a few-shot reference.
///
/// The original data source stored this as an untyped JSON blob; here the
/// two parts are explicit columns validated at the accessor boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecedentEntry {
    pub id: String,
    pub inquiry: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The four reference sets one pipeline run composes into a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceSets {
    pub manuals: Vec<ManualEntry>,
    pub products: Vec<ProductEntry>,
    pub scenarios: Vec<ScenarioEntry>,
    pub precedents: Vec<PrecedentEntry>,
}

/// One prior turn of a messaging-channel conversation, rendered into the
/// prompt as a numbered transcript line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub from_user: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Parses the `YYYY-MM-DD HH:MM:SS` timestamps SQLite's
/// `CURRENT_TIMESTAMP` default produces.
pub(crate) fn parse_sqlite_timestamp(raw: &str) -> Result<DateTime<Utc>, PromptError> {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
        .map_err(|e| PromptError::DataIntegrity(format!("Failed to parse date '{raw}': {e}")))
}
