//! # Prompt Composer
//!
//! Turns the four reference sets, an optional conversation history, and the
//! current inquiry into the system/user prompt pair sent to the AI provider.
//!
//! The template is fixed (see [`crate::prompts`]). There is no upper bound
//! on the amount of reference text included: large reference sets can
//! exceed the upstream model's context window. The source system had the
//! same gap and defined no truncation or ranking policy, so none is
//! invented here.

use crate::prompts::{
    CURRENT_MESSAGE_LABEL, HISTORY_HEADING, MANUALS_HEADING, PRECEDENTS_HEADING, PRODUCTS_HEADING,
    SCENARIOS_HEADING, STRICT_RULE_PREFIX, SUGGESTION_DIRECTIVES, SUGGESTION_PERSONA,
};
use crate::types::{ConversationTurn, ReferenceSets};

/// The system/user prompt pair produced for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
}

/// Composes a prompt with the default persona.
pub fn compose(sets: &ReferenceSets, inquiry: &str, history: &[ConversationTurn]) -> ComposedPrompt {
    compose_with_persona(SUGGESTION_PERSONA, sets, inquiry, history)
}

/// Composes a prompt with a deployment-specific persona paragraph.
///
/// Empty reference lists render their heading with no body; they never
/// cause a failure.
pub fn compose_with_persona(
    persona: &str,
    sets: &ReferenceSets,
    inquiry: &str,
    history: &[ConversationTurn],
) -> ComposedPrompt {
    let manuals = sets
        .manuals
        .iter()
        .map(|m| format!("{STRICT_RULE_PREFIX}{}", m.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    let products = sets
        .products
        .iter()
        .map(|p| p.content.clone())
        .collect::<Vec<_>>()
        .join("\n\n");

    let scenarios = sets
        .scenarios
        .iter()
        .map(|s| format!("[{}]\n{}", s.title, s.prompt))
        .collect::<Vec<_>>()
        .join("\n\n");

    let precedents = sets
        .precedents
        .iter()
        .map(|p| {
            format!(
                "Previous Case - Question: {}\nSuccessful Answer: {}",
                p.inquiry, p.response
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let conversation_context = render_conversation_context(inquiry, history);

    let system = format!(
        "{persona}\n\n\
         {MANUALS_HEADING}\n{manuals}\n\n\
         {PRODUCTS_HEADING}\n{products}\n\n\
         {SCENARIOS_HEADING}\n{scenarios}\n\n\
         {PRECEDENTS_HEADING}\n{precedents}\n\n\
         {conversation_context}\n\n\
         {SUGGESTION_DIRECTIVES}"
    );

    ComposedPrompt {
        system,
        user: inquiry.to_string(),
    }
}

/// Renders the prior turns as a numbered chronological transcript with the
/// current message appended last, or just the current message when there is
/// no history.
fn render_conversation_context(inquiry: &str, history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return format!("{CURRENT_MESSAGE_LABEL} {inquiry}");
    }

    let transcript = history
        .iter()
        .enumerate()
        .map(|(index, turn)| {
            let speaker = if turn.from_user { "Customer" } else { "Support" };
            let stamp = turn
                .timestamp
                .map(|t| format!(" ({})", t.format("%Y-%m-%d %H:%M:%S")))
                .unwrap_or_default();
            format!("{}. {speaker}: {}{stamp}", index + 1, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{HISTORY_HEADING}\n{transcript}\n\n{CURRENT_MESSAGE_LABEL} {inquiry}")
}
