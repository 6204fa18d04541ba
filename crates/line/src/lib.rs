//! # replykit-line
//!
//! LINE Messaging API integration: webhook payload types, request
//! signature verification, and a thin client for the reply, push and
//! profile endpoints.

pub mod client;
pub mod signature;
pub mod types;

pub use client::{LineClient, DEFAULT_LINE_API_URL};
pub use signature::verify_signature;
pub use types::{Profile, WebhookEvent, WebhookMessage, WebhookRequest, WebhookSource};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Request to LINE API failed: {0}")]
    Request(reqwest::Error),
    #[error("LINE API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to deserialize LINE API response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Invalid channel secret")]
    InvalidChannelSecret,
}
