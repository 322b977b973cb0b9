//! Gemini `generateContent` adapter
//!
//! Gemini speaks `user`/`model`, requires the conversation to open with a
//! user turn and rejects consecutive turns of the same role. Responses may
//! carry `thought: true` parts, which are internal reasoning and only
//! returned when nothing else came back.

use super::http::send_json;
use async_trait::async_trait;
use newsroom_application::ports::provider::{ProviderAdapter, ProviderError, ProviderRequest};
use newsroom_domain::{Message, ProviderKind, Role};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Inserted when a conversation would otherwise open with a model turn
const SYNTHETIC_OPENING: &str = "Continue.";

/// Finish reasons that mean the answer was withheld
const SAFETY_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "IMAGE_SAFETY",
];

pub struct GeminiAdapter {
    client: Client,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn send(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        let body = build_request(request);
        let builder = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, request.model
            ))
            .header("x-goog-api-key", &request.api_key);
        let response: GenerateResponse = send_json(builder, &body).await?;
        extract_text(response)
    }
}

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        _ => "user",
    }
}

/// Map the conversation onto Gemini turns: merge same-role runs and make
/// sure the first turn is a user turn.
fn build_contents(messages: &[Message]) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::new();
    for m in messages.iter().filter(|m| m.role != Role::System) {
        let role = gemini_role(m.role);
        let part = TextPart {
            text: m.content.clone(),
        };
        match contents.last_mut() {
            Some(last) if last.role == Some(role) => last.parts.push(part),
            _ => contents.push(Content {
                role: Some(role),
                parts: vec![part],
            }),
        }
    }
    if contents.first().is_some_and(|c| c.role == Some("model")) {
        contents.insert(
            0,
            Content {
                role: Some("user"),
                parts: vec![TextPart {
                    text: SYNTHETIC_OPENING.to_string(),
                }],
            },
        );
    }
    contents
}

fn build_request(request: &ProviderRequest) -> GenerateRequest {
    let mut system: Vec<TextPart> = Vec::new();
    if !request.system_prompt.trim().is_empty() {
        system.push(TextPart {
            text: request.system_prompt.clone(),
        });
    }
    system.extend(
        request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| TextPart {
                text: m.content.clone(),
            }),
    );

    GenerateRequest {
        contents: build_contents(&request.messages),
        system_instruction: (!system.is_empty()).then_some(Content {
            role: None,
            parts: system,
        }),
        generation_config: GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        },
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, ProviderError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ProviderError::SafetyBlocked(format!(
            "prompt blocked ({reason})"
        )));
    }
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ProviderError::EmptyResponse);
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let (thoughts, answers): (Vec<ResponsePart>, Vec<ResponsePart>) =
        parts.into_iter().partition(|p| p.thought);

    let answer: String = answers.into_iter().filter_map(|p| p.text).collect();
    if !answer.trim().is_empty() {
        return Ok(answer);
    }

    if let Some(reason) = candidate.finish_reason.as_deref()
        && SAFETY_FINISH_REASONS.contains(&reason)
    {
        return Err(ProviderError::SafetyBlocked(format!(
            "answer withheld ({reason})"
        )));
    }

    let reasoning: String = thoughts.into_iter().filter_map(|p| p.text).collect();
    if !reasoning.trim().is_empty() {
        warn!("Gemini returned only internal reasoning, using it as the answer");
        return Ok(reasoning);
    }
    Err(ProviderError::EmptyResponse)
}
