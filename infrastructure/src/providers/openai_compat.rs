//! OpenAI-compatible chat completions (OpenRouter, Kimi)
//!
//! The system prompt is injected as the first element of `messages`. The
//! wire types are shared with the Mistral adapter, whose plain chat models
//! speak the same dialect.

use super::http::send_json;
use async_trait::async_trait;
use newsroom_application::ports::provider::{ProviderAdapter, ProviderError, ProviderRequest};
use newsroom_domain::{Message, ProviderKind, Role};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const KIMI_BASE_URL: &str = "https://api.moonshot.ai/v1";

pub struct OpenAiCompatAdapter {
    kind: ProviderKind,
    client: Client,
    base_url: String,
    extra_headers: Vec<(&'static str, String)>,
}

impl OpenAiCompatAdapter {
    pub fn new(kind: ProviderKind, client: Client, base_url: impl Into<String>) -> Self {
        Self {
            kind,
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            extra_headers: Vec::new(),
        }
    }

    /// OpenRouter asks callers to identify themselves
    pub fn openrouter(client: Client, base_url: impl Into<String>) -> Self {
        Self::new(ProviderKind::OpenRouter, client, base_url)
            .with_header("HTTP-Referer", "https://github.com/newsroom-fm/newsroom")
            .with_header("X-Title", "newsroom")
    }

    pub fn kimi(client: Client, base_url: impl Into<String>) -> Self {
        Self::new(ProviderKind::Kimi, client, base_url)
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.extra_headers.push((name, value.into()));
        self
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn send(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        let body = ChatRequest::chat(request);
        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&request.api_key);
        for (name, value) in &self.extra_headers {
            builder = builder.header(*name, value);
        }
        let response: ChatResponse = send_json(builder, &body).await?;
        extract_chat_text(response)
    }
}

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Plain chat completion with the system prompt as the first message
    pub fn chat(request: &ProviderRequest) -> Self {
        Self {
            model: Some(request.model.clone()),
            agent_id: None,
            messages: chat_messages(&request.system_prompt, &request.messages),
            temperature: Some(request.temperature),
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role: role.as_str().to_string(),
            content: content.into(),
        }
    }
}

pub(crate) fn chat_messages(system_prompt: &str, messages: &[Message]) -> Vec<ChatMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if !system_prompt.trim().is_empty() {
        out.push(ChatMessage::new(Role::System, system_prompt));
    }
    out.extend(messages.iter().map(|m| ChatMessage::new(m.role, &m.content)));
    out
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    /// A string, or an array of typed parts on some routes
    content: Option<Value>,
}

fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter(|p| p.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect(),
        _ => String::new(),
    }
}

pub(crate) fn extract_chat_text(response: ChatResponse) -> Result<String, ProviderError> {
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(ProviderError::EmptyResponse);
    };
    let text = choice
        .message
        .and_then(|m| m.content)
        .map(|c| content_text(&c))
        .unwrap_or_default();
    if !text.trim().is_empty() {
        return Ok(text);
    }
    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(ProviderError::SafetyBlocked(
            "response withheld by content filter".to_string(),
        ));
    }
    Err(ProviderError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_prompt_is_first_message() {
        let request = ProviderRequest {
            api_key: "k".into(),
            model: "openai/gpt-4o-mini".into(),
            system_prompt: "You are the news editor.".into(),
            messages: vec![Message::user("Top story?")],
            temperature: 0.5,
            max_tokens: 512,
            agent_handle: None,
        };
        let body = serde_json::to_value(ChatRequest::chat(&request)).unwrap();
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "content": "You are the news editor."},
                {"role": "user", "content": "Top story?"}
            ])
        );
        assert_eq!(body["model"], "openai/gpt-4o-mini");
        assert!(body.get("agent_id").is_none());
    }

    #[test]
    fn test_blank_system_prompt_is_omitted() {
        let messages = chat_messages("  ", &[Message::user("hi")]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[test]
    fn test_extract_string_and_part_content() {
        let plain: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "Lead with the budget."}, "finish_reason": "stop"}]
        }))
        .unwrap();
        assert_eq!(extract_chat_text(plain).unwrap(), "Lead with the budget.");

        let parts: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]}}]
        }))
        .unwrap();
        assert_eq!(extract_chat_text(parts).unwrap(), "ab");
    }

    #[test]
    fn test_content_filter_and_empty() {
        let filtered: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null}, "finish_reason": "content_filter"}]
        }))
        .unwrap();
        assert!(matches!(
            extract_chat_text(filtered),
            Err(ProviderError::SafetyBlocked(_))
        ));

        let none: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(extract_chat_text(none), Err(ProviderError::EmptyResponse));
    }
}
