use crate::{errors::PromptError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    temperature: f32,
    response_format: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

/// The fixed JSON schema the provider asks the model to conform to.
///
/// Mirrors [`crate::types::AiResponse`]: a `scenarios` array whose elements
/// carry exactly `reply`, `scenarioType`, `notes` and a three-valued
/// `sentiment`, with no additional properties.
pub fn scenario_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "customer_support_response",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "scenarios": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "reply": {
                                    "type": "string",
                                    "description": "Specific reply message"
                                },
                                "scenarioType": {
                                    "type": "string",
                                    "description": "Predefined scenario title, or an AI-suggested label"
                                },
                                "notes": {
                                    "type": "string",
                                    "description": "Reason for scenario selection or additional information"
                                },
                                "sentiment": {
                                    "type": "string",
                                    "enum": ["positive", "negative", "neutral"],
                                    "description": "Emotional tone of the reply"
                                }
                            },
                            "required": ["reply", "scenarioType", "notes", "sentiment"]
                        }
                    }
                },
                "required": ["scenarios"],
                "additionalProperties": false
            }
        }
    })
}

// --- Provider implementation ---

/// A provider for OpenRouter or any OpenAI-compatible chat-completions API.
///
/// One outbound call per request; no retry, no timeout override beyond the
/// HTTP client default, no circuit breaker.
#[derive(Clone, Debug)]
pub struct OpenAiCompatProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl OpenAiCompatProvider {
    /// Creates a new `OpenAiCompatProvider`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiCompatProvider {
    /// Requests a schema-constrained completion for the composed prompts.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            },
        ];

        let request_body = ChatCompletionRequest {
            messages,
            model: self.model.as_deref(),
            temperature: 0.7,
            response_format: scenario_response_format(),
        };

        let mut request_builder = self.client.post(&self.api_url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(PromptError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi(error_text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(PromptError::AiDeserialization)?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or(PromptError::AiMissingContent)
    }
}
