//! Webhook payload and profile types, following the LINE Messaging API
//! wire format. Only the fields this service consumes are modeled;
//! everything else in a delivery is ignored by serde.

use serde::{Deserialize, Serialize};

/// The body of one webhook delivery. A delivery may carry zero events
/// (LINE sends these to verify the endpoint) or several.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event kind, e.g. "message", "follow", "unfollow".
    #[serde(rename = "type")]
    pub event_type: String,
    pub message: Option<WebhookMessage>,
    pub source: Option<WebhookSource>,
    /// One-shot token for replying to this event.
    #[serde(rename = "replyToken")]
    pub reply_token: Option<String>,
    /// Event time in milliseconds since the epoch.
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub id: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// A channel user's profile, from `GET /profile/{userId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "pictureUrl")]
    pub picture_url: Option<String>,
    #[serde(rename = "statusMessage")]
    pub status_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_text_message_delivery() {
        let raw = r#"{
            "destination": "U000",
            "events": [{
                "type": "message",
                "replyToken": "rt-1",
                "timestamp": 1700000000000,
                "source": {"type": "user", "userId": "U123"},
                "message": {"type": "text", "id": "m1", "text": "Where is my order?"}
            }]
        }"#;

        let request: WebhookRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.events.len(), 1);
        let event = &request.events[0];
        assert_eq!(event.event_type, "message");
        assert_eq!(event.reply_token.as_deref(), Some("rt-1"));
        assert_eq!(
            event.source.as_ref().unwrap().user_id.as_deref(),
            Some("U123")
        );
        assert_eq!(
            event.message.as_ref().unwrap().text.as_deref(),
            Some("Where is my order?")
        );
    }

    #[test]
    fn parses_an_endpoint_verification_delivery_with_no_events() {
        let request: WebhookRequest = serde_json::from_str(r#"{"events":[]}"#).unwrap();
        assert!(request.events.is_empty());
    }

    #[test]
    fn non_text_events_still_parse() {
        let raw = r#"{"events":[{"type":"follow","source":{"type":"user","userId":"U9"}}]}"#;
        let request: WebhookRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.events[0].event_type, "follow");
        assert!(request.events[0].message.is_none());
    }
}
