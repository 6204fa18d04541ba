//! End-to-end tests for `POST /api/suggest` against a mock OpenAI-compatible
//! provider, including the fallback contract and the experience log.

mod common;

use anyhow::Result;
use common::{generate_jwt, TestApp};
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

const SCENARIOS_PAYLOAD: &str = r#"{"scenarios":[
    {"reply":"We are very sorry about the delay. A replacement ships today.","scenarioType":"Shipping Delay","notes":"matches the stored scenario","sentiment":"negative"},
    {"reply":"Thank you for your patience! Tracking follows shortly.","scenarioType":"AI: Reassure","notes":"an original softer option","sentiment":"positive"}
]}"#;

fn completion_body(content: &str) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

/// Polls `/api/experiences` until the fire-and-forget log write lands.
async fn wait_for_experiences(app: &TestApp, token: &str) -> Result<Value> {
    for _ in 0..50 {
        let response = app
            .client
            .get(format!("{}/api/experiences", app.address))
            .bearer_auth(token)
            .send()
            .await?;
        let body: Value = response.json().await?;
        if !body["result"].as_array().unwrap().is_empty() {
            return Ok(body);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    anyhow::bail!("experience log entry never appeared")
}

#[tokio::test]
async fn suggest_returns_scenarios_and_sends_references_to_the_model() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = generate_jwt("agent@example.com")?;

    // Seed a manual and a scenario through the API.
    app.client
        .post(format!("{}/api/manuals", app.address))
        .bearer_auth(&token)
        .json(&json!({ "content": "Never promise exact delivery dates." }))
        .send()
        .await?;
    app.client
        .post(format!("{}/api/scenarios", app.address))
        .bearer_auth(&token)
        .json(&json!({ "title": "Shipping Delay", "prompt": "Apologize and give a new estimate." }))
        .send()
        .await?;

    let ai_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("STRICT RULE: Never promise exact delivery dates.")
            .body_contains("json_schema");
        then.status(200)
            .json_body(completion_body(SCENARIOS_PAYLOAD));
    });

    let response = app
        .client
        .post(format!("{}/api/suggest", app.address))
        .bearer_auth(&token)
        .json(&json!({ "inquiry": "Where is my order? It is a week late." }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    let scenarios = body["result"]["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0]["scenarioType"], "Shipping Delay");
    assert_eq!(scenarios[1]["sentiment"], "positive");
    ai_mock.assert();

    // The run lands in the experience log with its reference snapshot.
    let experiences = wait_for_experiences(&app, &token).await?;
    let record = &experiences["result"][0];
    assert_eq!(record["inquiry"], "Where is my order? It is a week late.");
    assert_eq!(
        record["manuals"][0],
        "Never promise exact delivery dates."
    );
    assert_eq!(record["scenarios"][0], "Shipping Delay");
    Ok(())
}

#[tokio::test]
async fn upstream_failure_returns_500_with_the_fallback_scenario() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = generate_jwt("agent@example.com")?;

    app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let response = app
        .client
        .post(format!("{}/api/suggest", app.address))
        .bearer_auth(&token)
        .json(&json!({ "inquiry": "Hello?" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    let scenarios = body["result"]["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0]["scenarioType"], "error");
    assert_eq!(scenarios[0]["sentiment"], "neutral");
    Ok(())
}

#[tokio::test]
async fn malformed_model_output_returns_500_with_the_fallback_scenario() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = generate_jwt("agent@example.com")?;

    app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(completion_body("Sure! Here are some ideas in prose."));
    });

    let response = app
        .client
        .post(format!("{}/api/suggest", app.address))
        .bearer_auth(&token)
        .json(&json!({ "inquiry": "Hi" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["result"]["scenarios"][0]["scenarioType"], "error");
    Ok(())
}

#[tokio::test]
async fn empty_inquiry_is_a_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = generate_jwt("agent@example.com")?;

    let response = app
        .client
        .post(format!("{}/api/suggest", app.address))
        .bearer_auth(&token)
        .json(&json!({ "inquiry": "  " }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn suggest_requires_authentication() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .post(format!("{}/api/suggest", app.address))
        .json(&json!({ "inquiry": "Where is my order?" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn history_turns_are_rendered_into_the_prompt() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = generate_jwt("agent@example.com")?;

    let ai_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("1. Customer: My tracking number does not work")
            .body_contains("Current Customer Message: It is #1234");
        then.status(200)
            .json_body(completion_body(SCENARIOS_PAYLOAD));
    });

    let response = app
        .client
        .post(format!("{}/api/suggest", app.address))
        .bearer_auth(&token)
        .json(&json!({
            "inquiry": "It is #1234",
            "history": [
                { "from_user": true, "text": "My tracking number does not work" },
                { "from_user": false, "text": "Could you share the order id?" }
            ]
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    ai_mock.assert();
    Ok(())
}
