use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::update_types::InboundEvent;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Failures observed while talking to the chat platform. Fetch-side errors
/// feed the backoff controller; send-side errors are logged and dropped.
pub enum TransportError {
    #[error("telegram {method} request failed: {detail}")]
    Network { method: &'static str, detail: String },
    #[error("telegram {method} returned status {status}: {detail}")]
    Status {
        method: &'static str,
        status: u16,
        detail: String,
    },
    #[error("telegram {method} rejected the call: {description}")]
    Rejected {
        method: &'static str,
        description: String,
    },
    #[error("failed to decode telegram {method} response: {detail}")]
    Decode { method: &'static str, detail: String },
}

/// Transport seam between the dispatch loop and the Telegram Bot API.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Long-polls for the next batch of events with ids above `after_cursor`,
    /// blocking up to the clamped timeout. An empty batch is a normal
    /// timeout, not an error.
    async fn fetch_events(
        &self,
        after_cursor: u64,
        timeout_seconds: u64,
    ) -> Result<Vec<InboundEvent>, TransportError>;

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;

    async fn send_text_with_options(
        &self,
        chat_id: i64,
        text: &str,
        options: &Value,
    ) -> Result<(), TransportError>;

    async fn acknowledge_action(&self, action_id: &str) -> Result<(), TransportError>;
}
