use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::chat_transport::{ChatTransport, TransportError};
use crate::update_types::{InboundEvent, TelegramUpdate};

/// Bounds the Bot API enforces on the `getUpdates` long-poll timeout.
pub const MIN_LONG_POLL_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_LONG_POLL_TIMEOUT_SECONDS: u64 = 25;

const ERROR_DETAIL_MAX_CHARS: usize = 400;

/// Clamps a requested long-poll timeout into the range the transport accepts
/// rather than passing it through unchecked.
pub fn clamp_long_poll_timeout(requested_seconds: u64) -> u64 {
    requested_seconds.clamp(MIN_LONG_POLL_TIMEOUT_SECONDS, MAX_LONG_POLL_TIMEOUT_SECONDS)
}

#[derive(Debug, Clone, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

#[derive(Clone)]
/// Telegram Bot API client backing both the event source and outbound sends.
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str, request_timeout_ms: u64) -> Result<Self> {
        // The client-level timeout must outlast the long-poll window; the
        // CLI default of 30s leaves a 5s grace over the clamped 25s poll.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create telegram api client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<T: DeserializeOwned + Default>(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = request.send().await.map_err(|error| TransportError::Network {
            method,
            detail: error.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                method,
                status: status.as_u16(),
                detail: truncate_for_error(&body, ERROR_DETAIL_MAX_CHARS),
            });
        }
        let envelope: ApiEnvelope<T> =
            response.json().await.map_err(|error| TransportError::Decode {
                method,
                detail: error.to_string(),
            })?;
        if !envelope.ok {
            return Err(TransportError::Rejected {
                method,
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }
        envelope.result.ok_or_else(|| TransportError::Decode {
            method,
            detail: "missing result field".to_string(),
        })
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn fetch_events(
        &self,
        after_cursor: u64,
        timeout_seconds: u64,
    ) -> Result<Vec<InboundEvent>, TransportError> {
        let timeout = clamp_long_poll_timeout(timeout_seconds);
        let request = self.http.get(self.method_url("getUpdates")).query(&[
            ("offset", after_cursor.saturating_add(1).to_string()),
            ("timeout", timeout.to_string()),
            // Keeps every delivered update mappable to an event, so the
            // cursor never has to skip opaque update kinds.
            (
                "allowed_updates",
                r#"["message","callback_query"]"#.to_string(),
            ),
        ]);
        let updates: Vec<TelegramUpdate> = self.call("getUpdates", request).await?;
        Ok(updates
            .into_iter()
            .filter_map(InboundEvent::from_update)
            .collect())
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });
        let request = self.http.post(self.method_url("sendMessage")).json(&payload);
        self.call::<Value>("sendMessage", request).await.map(|_| ())
    }

    async fn send_text_with_options(
        &self,
        chat_id: i64,
        text: &str,
        options: &Value,
    ) -> Result<(), TransportError> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });
        if let (Some(body), Some(extra)) = (payload.as_object_mut(), options.as_object()) {
            for (key, value) in extra {
                body.insert(key.clone(), value.clone());
            }
        }
        let request = self.http.post(self.method_url("sendMessage")).json(&payload);
        self.call::<Value>("sendMessage", request).await.map(|_| ())
    }

    async fn acknowledge_action(&self, action_id: &str) -> Result<(), TransportError> {
        let payload = json!({ "callback_query_id": action_id });
        let request = self
            .http
            .post(self.method_url("answerCallbackQuery"))
            .json(&payload);
        self.call::<Value>("answerCallbackQuery", request)
            .await
            .map(|_| ())
    }
}

fn truncate_for_error(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_string();
    }
    let truncated: String = raw.chars().take(max_chars).collect();
    format!("{truncated}…")
}
