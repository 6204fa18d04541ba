//! # Suggestion Pipeline
//!
//! The end-to-end path from an inquiry to a structured set of candidate
//! replies: load the owner's reference sets, compose the prompt, call the
//! AI provider, validate the payload, and log the run. Any failure after
//! authentication collapses into a single-scenario fallback response, so
//! callers always receive a well-formed result.

use crate::composer::compose_with_persona;
use crate::errors::PromptError;
use crate::experience::ExperienceLogger;
use crate::prompts::SUGGESTION_PERSONA;
use crate::providers::ai::AiProvider;
use crate::types::{AiResponse, ConversationTurn, ReferenceSets};
use crate::validator::{classify, fallback_response, parse_ai_response, FailureKind};
use tracing::{debug, error, info};
use turso::Database;

/// What one pipeline run produced.
///
/// `response` is always populated. When `failure` is set, `response` is the
/// synthetic error scenario for that failure class and callers should map
/// it to an error status.
#[derive(Debug, Clone)]
pub struct SuggestionOutcome {
    pub response: AiResponse,
    pub failure: Option<FailureKind>,
}

/// Runs suggestion requests against one AI provider and one database.
#[derive(Debug, Clone)]
pub struct SuggestionPipeline {
    provider: Box<dyn AiProvider>,
    db: Database,
    persona: String,
}

impl SuggestionPipeline {
    pub fn new(provider: Box<dyn AiProvider>, db: Database) -> Self {
        Self {
            provider,
            db,
            persona: SUGGESTION_PERSONA.to_string(),
        }
    }

    /// Overrides the default persona paragraph.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Produces candidate replies for one inquiry.
    ///
    /// Never returns an error: failures are classified and reported through
    /// [`SuggestionOutcome::failure`] alongside the fallback response. The
    /// run is appended to the experience log either way, off the request
    /// path.
    pub async fn suggest(
        &self,
        owner_id: &str,
        inquiry: &str,
        history: &[ConversationTurn],
    ) -> SuggestionOutcome {
        let sets = match ReferenceSets::fetch(&self.db, owner_id).await {
            Ok(sets) => sets,
            Err(e) => {
                let failure = classify(&e);
                error!(owner_id, error = %e, ?failure, "failed to load reference sets");
                let response = fallback_response(failure);
                ExperienceLogger::new(self.db.clone()).spawn_record(
                    owner_id.to_string(),
                    inquiry.to_string(),
                    response.clone(),
                    ReferenceSets::default(),
                );
                return SuggestionOutcome {
                    response,
                    failure: Some(failure),
                };
            }
        };

        self.suggest_with_sets(owner_id, inquiry, history, sets).await
    }

    /// Like [`suggest`](Self::suggest), but with caller-supplied reference
    /// sets instead of a database fetch. Used when the caller already holds
    /// the lists, for example a form that edits them in place.
    pub async fn suggest_with_sets(
        &self,
        owner_id: &str,
        inquiry: &str,
        history: &[ConversationTurn],
        sets: ReferenceSets,
    ) -> SuggestionOutcome {
        let (response, failure, sets) = match self.run(inquiry, history, sets).await {
            Ok((response, sets)) => {
                info!(
                    owner_id,
                    scenarios = response.scenarios.len(),
                    "suggestion run succeeded"
                );
                (response, None, sets)
            }
            Err((e, sets)) => {
                let failure = classify(&e);
                error!(owner_id, error = %e, ?failure, "suggestion run failed");
                (fallback_response(failure), Some(failure), sets)
            }
        };

        ExperienceLogger::new(self.db.clone()).spawn_record(
            owner_id.to_string(),
            inquiry.to_string(),
            response.clone(),
            sets,
        );

        SuggestionOutcome { response, failure }
    }

    /// The fallible core of a run. Returns the reference sets alongside the
    /// result so the caller can snapshot them into the experience log even
    /// when the run fails partway.
    async fn run(
        &self,
        inquiry: &str,
        history: &[ConversationTurn],
        sets: ReferenceSets,
    ) -> Result<(AiResponse, ReferenceSets), (PromptError, ReferenceSets)> {
        let prompt = compose_with_persona(&self.persona, &sets, inquiry, history);
        debug!(
            system_len = prompt.system.len(),
            user_len = prompt.user.len(),
            "composed suggestion prompt"
        );

        let raw = match self.provider.generate(&prompt.system, &prompt.user).await {
            Ok(raw) => raw,
            Err(e) => return Err((e, sets)),
        };

        match parse_ai_response(&raw) {
            Ok(response) => Ok((response, sets)),
            Err(e) => Err((e, sets)),
        }
    }
}
