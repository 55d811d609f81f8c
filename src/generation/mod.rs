
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::CeylonError;
use crate::config::Config;

/// Outbound generation requests block for at most this long before failing
const GENERATION_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of the two-message exchange sent to the chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Known chat-completion response shapes, tried in priority order
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplyShape {
    Chat { message: ReplyMessage },
    Content { content: String },
    Generate { response: String },
}

/// Pull the reply text out of a response payload. Total over any payload:
/// unknown shapes degrade to the raw payload text rather than failing.
#[inline]
pub fn extract_reply(payload: &str) -> String {
    match serde_json::from_str::<ReplyShape>(payload) {
        Ok(ReplyShape::Chat { message }) => message.content,
        Ok(ReplyShape::Content { content }) => content,
        Ok(ReplyShape::Generate { response }) => response,
        Err(_) => payload.to_string(),
    }
}

/// Synchronous client for the chat-completion endpoint.
/// Fail fast: one request, a long fixed timeout, no retry or backoff.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: Url,
    model: String,
    agent: ureq::Agent,
}

impl ChatClient {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config
            .ollama
            .base_url()
            .context("Failed to build chat endpoint URL from config")?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(GENERATION_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            base_url,
            model: config.ollama.chat_model.clone(),
            agent,
        })
    }

    /// Send the message list to `/api/chat` and extract the reply text.
    /// Non-success HTTP statuses and transport failures propagate as errors.
    #[inline]
    pub fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = self
            .base_url
            .join("/api/chat")
            .context("Failed to build chat URL")?;

        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };
        let request_json =
            serde_json::to_string(&request).context("Failed to serialize chat request")?;

        debug!(
            "Sending chat request to {} with model {} ({} messages)",
            url,
            self.model,
            messages.len()
        );

        let response_text = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|error| match error {
                ureq::Error::StatusCode(status) => CeylonError::Generation(format!(
                    "Chat endpoint returned HTTP {status}"
                )),
                other => {
                    CeylonError::Generation(format!("Chat request failed: {other}"))
                }
            })?;

        Ok(extract_reply(&response_text))
    }
}
