//! Minimal client for the three LINE Messaging API endpoints this service
//! calls: message reply, message push, and user profile lookup.

use crate::{types::Profile, LineError};
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

pub const DEFAULT_LINE_API_URL: &str = "https://api.line.me/v2/bot";

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

impl<'a> TextMessage<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            message_type: "text",
            text,
        }
    }
}

/// An authenticated client for one LINE channel.
#[derive(Debug, Clone)]
pub struct LineClient {
    client: ReqwestClient,
    api_url: String,
    channel_access_token: String,
}

impl LineClient {
    /// Creates a client against the production LINE API.
    pub fn new(channel_access_token: String) -> Result<Self, LineError> {
        Self::with_api_url(channel_access_token, DEFAULT_LINE_API_URL.to_string())
    }

    /// Creates a client against a custom base URL, used by tests to point
    /// at a mock server.
    pub fn with_api_url(channel_access_token: String, api_url: String) -> Result<Self, LineError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(LineError::ClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            channel_access_token,
        })
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), LineError> {
        let url = format!("{}{path}", self.api_url);
        debug!(%url, "sending LINE API request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.channel_access_token)
            .json(&body)
            .send()
            .await
            .map_err(LineError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LineError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Sends a text reply bound to a webhook event's one-shot reply token.
    pub async fn reply_message(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        self.post_json(
            "/message/reply",
            json!({
                "replyToken": reply_token,
                "messages": [TextMessage::new(text)],
            }),
        )
        .await
    }

    /// Pushes a text message to a user outside the reply-token window.
    pub async fn push_message(&self, to: &str, text: &str) -> Result<(), LineError> {
        self.post_json(
            "/message/push",
            json!({
                "to": to,
                "messages": [TextMessage::new(text)],
            }),
        )
        .await
    }

    /// Fetches a channel user's profile.
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, LineError> {
        let url = format!("{}/profile/{user_id}", self.api_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.channel_access_token)
            .send()
            .await
            .map_err(LineError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LineError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(LineError::Deserialization)
    }
}
