//! # Response Validator & Fallback
//!
//! Parses the model's JSON payload into an [`AiResponse`] and, when anything
//! in the pipeline fails, synthesizes the single error scenario the caller
//! receives instead. The contract for callers: a pipeline run always yields
//! a well-formed `AiResponse` with at least one scenario, never a raw error
//! and never an empty list.

use crate::errors::PromptError;
use crate::types::{AiResponse, ScenarioSuggestion, Sentiment};

/// The failure classes a pipeline run can collapse into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The caller was not authenticated.
    Auth,
    /// The upstream AI call failed (transport, non-2xx, missing content).
    Upstream,
    /// The upstream answered but the payload violated the schema.
    InvalidResponse,
    /// A server-side failure (storage, serialization).
    Server,
}

impl FailureKind {
    fn notes(self) -> &'static str {
        match self {
            FailureKind::Auth => "Authentication error",
            FailureKind::Upstream => "Upstream AI communication error",
            FailureKind::InvalidResponse => "Invalid AI response format",
            FailureKind::Server => "Server error",
        }
    }

    fn reply(self) -> &'static str {
        match self {
            FailureKind::Auth => "Authentication error: please sign in again.",
            FailureKind::Upstream => {
                "We are sorry - an error occurred while communicating with the AI service."
            }
            FailureKind::InvalidResponse => {
                "We are sorry - the AI service returned an unexpected response."
            }
            FailureKind::Server => "We are sorry - a server-side error occurred.",
        }
    }
}

/// Maps a pipeline error to the failure class reported in the fallback.
pub fn classify(error: &PromptError) -> FailureKind {
    match error {
        PromptError::AiRequest(_)
        | PromptError::AiApi(_)
        | PromptError::AiDeserialization(_)
        | PromptError::AiMissingContent
        | PromptError::ReqwestClientBuild(_) => FailureKind::Upstream,
        PromptError::InvalidResponse(_) => FailureKind::InvalidResponse,
        _ => FailureKind::Server,
    }
}

/// Parses and validates the raw completion content.
///
/// Rejects anything that is not a JSON object with a non-empty `scenarios`
/// array of records carrying all four fields and a valid sentiment value.
pub fn parse_ai_response(raw: &str) -> Result<AiResponse, PromptError> {
    let response: AiResponse = serde_json::from_str(raw)
        .map_err(|e| PromptError::InvalidResponse(format!("scenarios payload did not parse: {e}")))?;

    if response.scenarios.is_empty() {
        return Err(PromptError::InvalidResponse(
            "scenarios must be a non-empty array".to_string(),
        ));
    }

    Ok(response)
}

/// Builds the synthetic single-scenario response for a failed run.
pub fn fallback_response(failure: FailureKind) -> AiResponse {
    AiResponse {
        scenarios: vec![ScenarioSuggestion {
            reply: failure.reply().to_string(),
            scenario_type: "error".to_string(),
            notes: failure.notes().to_string(),
            sentiment: Sentiment::Neutral,
        }],
    }
}
