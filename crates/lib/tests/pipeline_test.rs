//! End-to-end tests for the suggestion pipeline with a mock AI provider.

use anyhow::Result;
use replykit::experience::ExperienceLogger;
use replykit::reference::{add_manual, add_scenario};
use replykit::types::ConversationTurn;
use replykit::{FailureKind, SuggestionPipeline};
use replykit_test_utils::{MockAiProvider, TestSetup};
use std::time::Duration;

const OWNER: &str = "owner-1";

const VALID_PAYLOAD: &str = r#"{"scenarios":[
    {"reply":"We are sorry about the delay. A replacement ships today.","scenarioType":"Shipping Delay","notes":"matches the delay template","sentiment":"negative"},
    {"reply":"Thanks for your patience! Tracking follows shortly.","scenarioType":"AI: Reassure","notes":"softer original option","sentiment":"positive"}
]}"#;

/// Waits for the fire-and-forget experience write to land.
async fn wait_for_log(logger: &ExperienceLogger, owner: &str) -> Result<usize> {
    for _ in 0..50 {
        let records = logger.list(owner, None).await?;
        if !records.is_empty() {
            return Ok(records.len());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Ok(0)
}

#[tokio::test]
async fn successful_run_returns_parsed_scenarios_and_logs_the_run() -> Result<()> {
    let setup = TestSetup::new().await?;
    add_manual(&setup.db, OWNER, "never promise exact delivery dates").await?;
    add_scenario(&setup.db, OWNER, "Shipping Delay", "apologize and give a new estimate").await?;

    let provider = MockAiProvider::new();
    provider.add_response("never promise exact delivery dates", VALID_PAYLOAD);

    let pipeline = SuggestionPipeline::new(Box::new(provider.clone()), setup.db.clone());
    let outcome = pipeline.suggest(OWNER, "Where is my order?", &[]).await;

    assert!(outcome.failure.is_none());
    assert_eq!(outcome.response.scenarios.len(), 2);
    assert_eq!(outcome.response.scenarios[0].scenario_type, "Shipping Delay");

    // The manual must have reached the provider as a strict rule.
    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0]
        .system
        .contains("STRICT RULE: never promise exact delivery dates"));
    assert_eq!(calls[0].user, "Where is my order?");

    let logger = ExperienceLogger::new(setup.db.clone());
    assert_eq!(wait_for_log(&logger, OWNER).await?, 1);
    let records = logger.list(OWNER, None).await?;
    assert_eq!(records[0].inquiry, "Where is my order?");
    assert_eq!(records[0].response.scenarios.len(), 2);
    assert_eq!(records[0].manuals, vec!["never promise exact delivery dates"]);
    assert_eq!(records[0].scenarios, vec!["Shipping Delay"]);
    Ok(())
}

#[tokio::test]
async fn provider_failure_collapses_into_upstream_fallback() -> Result<()> {
    let setup = TestSetup::new().await?;

    // No programmed response, so the mock fails every call.
    let provider = MockAiProvider::new();
    let pipeline = SuggestionPipeline::new(Box::new(provider), setup.db.clone());

    let outcome = pipeline.suggest(OWNER, "Hello?", &[]).await;

    assert_eq!(outcome.failure, Some(FailureKind::Upstream));
    assert_eq!(outcome.response.scenarios.len(), 1);
    assert_eq!(outcome.response.scenarios[0].scenario_type, "error");

    // The failed run is still logged.
    let logger = ExperienceLogger::new(setup.db.clone());
    assert_eq!(wait_for_log(&logger, OWNER).await?, 1);
    Ok(())
}

#[tokio::test]
async fn malformed_payload_collapses_into_invalid_response_fallback() -> Result<()> {
    let setup = TestSetup::new().await?;
    add_manual(&setup.db, OWNER, "be concise").await?;

    let provider = MockAiProvider::new();
    provider.add_response("be concise", "certainly! here are some ideas...");

    let pipeline = SuggestionPipeline::new(Box::new(provider), setup.db.clone());
    let outcome = pipeline.suggest(OWNER, "hi", &[]).await;

    assert_eq!(outcome.failure, Some(FailureKind::InvalidResponse));
    assert_eq!(outcome.response.scenarios.len(), 1);
    assert_eq!(outcome.response.scenarios[0].scenario_type, "error");
    Ok(())
}

#[tokio::test]
async fn empty_scenarios_payload_is_treated_as_invalid() -> Result<()> {
    let setup = TestSetup::new().await?;
    add_manual(&setup.db, OWNER, "be warm").await?;

    let provider = MockAiProvider::new();
    provider.add_response("be warm", r#"{"scenarios":[]}"#);

    let pipeline = SuggestionPipeline::new(Box::new(provider), setup.db.clone());
    let outcome = pipeline.suggest(OWNER, "hi", &[]).await;

    assert_eq!(outcome.failure, Some(FailureKind::InvalidResponse));
    Ok(())
}

#[tokio::test]
async fn history_is_rendered_into_the_system_prompt() -> Result<()> {
    let setup = TestSetup::new().await?;

    let provider = MockAiProvider::new();
    provider.add_response("1. Customer: My tracking number does not work", VALID_PAYLOAD);

    let history = vec![
        ConversationTurn {
            from_user: true,
            text: "My tracking number does not work".into(),
            timestamp: None,
        },
        ConversationTurn {
            from_user: false,
            text: "Could you share the order id?".into(),
            timestamp: None,
        },
    ];

    let pipeline = SuggestionPipeline::new(Box::new(provider.clone()), setup.db.clone());
    let outcome = pipeline.suggest(OWNER, "It is #1234", &history).await;

    assert!(outcome.failure.is_none());
    let calls = provider.get_calls();
    assert!(calls[0]
        .system
        .contains("2. Support: Could you share the order id?"));
    assert!(calls[0]
        .system
        .contains("Current Customer Message: It is #1234"));
    Ok(())
}

#[tokio::test]
async fn suggest_with_sets_uses_the_supplied_lists() -> Result<()> {
    let setup = TestSetup::new().await?;

    // Nothing stored in the database; the sets come from the caller.
    let sets = replykit::ReferenceSets {
        manuals: vec![],
        products: vec![],
        scenarios: vec![],
        precedents: vec![],
    };

    let provider = MockAiProvider::new();
    provider.add_response("Current Customer Message: Can I change my address?", VALID_PAYLOAD);

    let pipeline = SuggestionPipeline::new(Box::new(provider.clone()), setup.db.clone());
    let outcome = pipeline
        .suggest_with_sets(OWNER, "Can I change my address?", &[], sets)
        .await;

    assert!(outcome.failure.is_none());
    assert_eq!(provider.get_calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn experience_list_honors_the_limit() -> Result<()> {
    let setup = TestSetup::new().await?;
    add_manual(&setup.db, OWNER, "be brief").await?;

    let provider = MockAiProvider::new();
    provider.add_response("be brief", VALID_PAYLOAD);
    let pipeline = SuggestionPipeline::new(Box::new(provider), setup.db.clone());

    for inquiry in ["first", "second", "third"] {
        pipeline.suggest(OWNER, inquiry, &[]).await;
    }

    let logger = ExperienceLogger::new(setup.db.clone());
    for _ in 0..50 {
        if logger.list(OWNER, None).await?.len() == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(logger.list(OWNER, None).await?.len(), 3);
    assert_eq!(logger.list(OWNER, Some(2)).await?.len(), 2);
    Ok(())
}
