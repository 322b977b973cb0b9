//! Anthropic Messages API adapter
//!
//! The system prompt travels in its own top-level field; `messages` holds
//! only user/assistant turns.

use super::http::send_json;
use async_trait::async_trait;
use newsroom_application::ports::provider::{ProviderAdapter, ProviderError, ProviderRequest};
use newsroom_domain::{Message, ProviderKind, Role};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    client: Client,
    base_url: String,
}

impl AnthropicAdapter {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn send(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        let body = build_request(request);
        let builder = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &request.api_key)
            .header("anthropic-version", API_VERSION);
        let response: MessagesResponse = send_json(builder, &body).await?;
        extract_text(response)
    }
}

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "String::is_empty")]
    system: String,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, PartialEq, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

fn build_request(request: &ProviderRequest) -> MessagesRequest<'_> {
    // Stray system-role messages join the top-level system prompt
    let mut system = request.system_prompt.trim().to_string();
    for m in request.messages.iter().filter(|m| m.role == Role::System) {
        if !system.is_empty() {
            system.push_str("\n\n");
        }
        system.push_str(m.content.trim());
    }

    MessagesRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        system,
        messages: request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m: &Message| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect(),
    }
}

fn extract_text(response: MessagesResponse) -> Result<String, ProviderError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();
    if !text.trim().is_empty() {
        return Ok(text);
    }
    if response.stop_reason.as_deref() == Some("refusal") {
        return Err(ProviderError::SafetyBlocked(
            "model refused to answer".to_string(),
        ));
    }
    Err(ProviderError::EmptyResponse)
}
