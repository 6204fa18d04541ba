//! # replykit
//!
//! Core library for the reply-drafting service: owner-scoped reference
//! data, prompt composition, AI provider abstraction, response validation
//! with fallbacks, chat storage, and the append-only experience log.

pub mod chat;
pub mod composer;
pub mod errors;
pub mod experience;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod reference;
pub mod types;
pub mod validator;

pub use composer::{compose, compose_with_persona, ComposedPrompt};
pub use errors::PromptError;
pub use experience::{ExperienceLogger, ExperienceRecord};
pub use pipeline::{SuggestionOutcome, SuggestionPipeline};
pub use types::{
    AiResponse, ConversationTurn, ManualEntry, PrecedentEntry, ProductEntry, ReferenceSets,
    ScenarioEntry, ScenarioSuggestion, Sentiment,
};
pub use validator::{classify, fallback_response, parse_ai_response, FailureKind};
