//! Mistral adapter
//!
//! Plain chat models use the OpenAI-compatible shape. Agent models (those
//! called with a provider agent handle) go to the agents endpoint, which
//! accepts no `system` role: the system prompt is carried as bracketed
//! context inside the first user turn instead.

use super::http::send_json;
use super::openai_compat::{ChatMessage, ChatRequest, ChatResponse, extract_chat_text};
use async_trait::async_trait;
use newsroom_application::ports::provider::{ProviderAdapter, ProviderError, ProviderRequest};
use newsroom_domain::{Message, ProviderKind, Role};
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

pub struct MistralAdapter {
    client: Client,
    base_url: String,
}

impl MistralAdapter {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for MistralAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mistral
    }

    async fn send(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        let (path, body) = match request.agent_handle.as_deref() {
            Some(handle) => ("agents/completions", agent_request(request, handle)),
            None => ("chat/completions", ChatRequest::chat(request)),
        };
        let builder = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .bearer_auth(&request.api_key);
        let response: ChatResponse = send_json(builder, &body).await?;
        extract_chat_text(response)
    }
}

fn agent_request(request: &ProviderRequest, handle: &str) -> ChatRequest {
    ChatRequest {
        model: None,
        agent_id: Some(handle.to_string()),
        messages: agent_messages(&request.system_prompt, &request.messages),
        temperature: None,
        max_tokens: request.max_tokens,
    }
}

/// Conversation for the agents endpoint, system prompt folded into the
/// first user turn
fn agent_messages(system_prompt: &str, messages: &[Message]) -> Vec<ChatMessage> {
    let mut context: Vec<&str> = Vec::new();
    if !system_prompt.trim().is_empty() {
        context.push(system_prompt.trim());
    }
    context.extend(
        messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.trim()),
    );

    let mut out: Vec<ChatMessage> = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| ChatMessage::new(m.role, &m.content))
        .collect();
    if context.is_empty() {
        return out;
    }

    let prefix = format!("[Context: {}]", context.join("\n\n"));
    match out.iter_mut().find(|m| m.role == Role::User.as_str()) {
        Some(first_user) => first_user.content = format!("{prefix}\n\n{}", first_user.content),
        None => out.insert(0, ChatMessage::new(Role::User, prefix)),
    }
    out
}
