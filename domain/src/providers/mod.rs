//! Provider catalogue (provider-neutral, I/O-free).
//!
//! The five chat backends, the models each one accepts, the same-provider
//! downgrade table and the cross-provider preference order. Everything here is
//! compiled in; nothing is read from the store.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// AI backend identity (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    OpenRouter,
    Gemini,
    Mistral,
    Kimi,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Anthropic,
        ProviderKind::OpenRouter,
        ProviderKind::Gemini,
        ProviderKind::Mistral,
        ProviderKind::Kimi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Mistral => "mistral",
            ProviderKind::Kimi => "kimi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::OpenRouter => "OpenRouter",
            ProviderKind::Gemini => "Google Gemini",
            ProviderKind::Mistral => "Mistral AI",
            ProviderKind::Kimi => "Moonshot Kimi",
        }
    }

    /// Models accepted by this provider, in catalogue order
    pub fn models(&self) -> &'static [ModelSpec] {
        match self {
            ProviderKind::Anthropic => ANTHROPIC_MODELS,
            ProviderKind::OpenRouter => OPENROUTER_MODELS,
            ProviderKind::Gemini => GEMINI_MODELS,
            ProviderKind::Mistral => MISTRAL_MODELS,
            ProviderKind::Kimi => KIMI_MODELS,
        }
    }

    pub fn find_model(&self, model: &str) -> Option<&'static ModelSpec> {
        self.models().iter().find(|spec| spec.id == model)
    }

    pub fn supports_model(&self, model: &str) -> bool {
        self.find_model(model).is_some()
    }

    /// First listed model that is not a provider-native custom agent.
    ///
    /// Used by cross-provider fallback, which has no agent handle to offer.
    pub fn fallback_model(&self) -> &'static str {
        self.models()
            .iter()
            .find(|spec| !spec.custom_agent)
            .map(|spec| spec.id)
            .unwrap_or_default()
    }

    /// Reject a provider/model pairing that is not in the catalogue
    pub fn validate_model(&self, model: &str) -> Result<&'static ModelSpec, DomainError> {
        self.find_model(model).ok_or_else(|| DomainError::InvalidModel {
            provider: self.as_str().to_string(),
            model: model.to_string(),
        })
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "mistral" => Ok(ProviderKind::Mistral),
            "kimi" | "moonshot" => Ok(ProviderKind::Kimi),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// One entry of the static model catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpec {
    pub id: &'static str,
    pub label: &'static str,
    /// Slow "thinking" tier that gets the extended call timeout
    pub deep_reasoning: bool,
    /// Provider-native agent; requires `providerAgentHandle` on the config
    pub custom_agent: bool,
}

const fn model(id: &'static str, label: &'static str) -> ModelSpec {
    ModelSpec {
        id,
        label,
        deep_reasoning: false,
        custom_agent: false,
    }
}

const fn deep(id: &'static str, label: &'static str) -> ModelSpec {
    ModelSpec {
        id,
        label,
        deep_reasoning: true,
        custom_agent: false,
    }
}

const fn agent(id: &'static str, label: &'static str) -> ModelSpec {
    ModelSpec {
        id,
        label,
        deep_reasoning: false,
        custom_agent: true,
    }
}

static ANTHROPIC_MODELS: &[ModelSpec] = &[
    model("claude-sonnet-4-5", "Claude Sonnet 4.5"),
    model("claude-haiku-4-5", "Claude Haiku 4.5"),
    deep("claude-opus-4-1", "Claude Opus 4.1"),
];

static OPENROUTER_MODELS: &[ModelSpec] = &[
    model("openai/gpt-4o-mini", "GPT-4o mini"),
    model("meta-llama/llama-3.3-70b-instruct", "Llama 3.3 70B"),
    model("google/gemini-2.0-flash-001", "Gemini 2.0 Flash (OpenRouter)"),
    deep("deepseek/deepseek-r1", "DeepSeek R1"),
];

static GEMINI_MODELS: &[ModelSpec] = &[
    model("gemini-2.5-flash", "Gemini 2.5 Flash"),
    model("gemini-2.0-flash", "Gemini 2.0 Flash"),
    deep("gemini-2.5-pro", "Gemini 2.5 Pro"),
];

static MISTRAL_MODELS: &[ModelSpec] = &[
    agent("mistral-agent", "Mistral custom agent"),
    model("mistral-large-latest", "Mistral Large"),
    model("mistral-small-latest", "Mistral Small"),
];

static KIMI_MODELS: &[ModelSpec] = &[
    model("kimi-k2-0905-preview", "Kimi K2"),
    model("moonshot-v1-32k", "Moonshot v1 32k"),
    deep("kimi-k2-thinking", "Kimi K2 Thinking"),
];

/// Same-provider downgrade table: failure-prone model → safer model on the
/// identical provider.
static DOWNGRADES: &[(ProviderKind, &str, &str)] = &[
    (ProviderKind::Anthropic, "claude-opus-4-1", "claude-sonnet-4-5"),
    (ProviderKind::Anthropic, "claude-sonnet-4-5", "claude-haiku-4-5"),
    (ProviderKind::OpenRouter, "deepseek/deepseek-r1", "openai/gpt-4o-mini"),
    (ProviderKind::Gemini, "gemini-2.5-pro", "gemini-2.5-flash"),
    (ProviderKind::Gemini, "gemini-2.5-flash", "gemini-2.0-flash"),
    (ProviderKind::Mistral, "mistral-agent", "mistral-large-latest"),
    (ProviderKind::Mistral, "mistral-large-latest", "mistral-small-latest"),
    (ProviderKind::Kimi, "kimi-k2-thinking", "kimi-k2-0905-preview"),
];

/// Look up the same-provider downgrade for a model, if one exists
pub fn downgrade_for(provider: ProviderKind, model: &str) -> Option<&'static str> {
    DOWNGRADES
        .iter()
        .find(|(kind, from, _)| *kind == provider && *from == model)
        .map(|(_, _, to)| *to)
}

/// Default cross-provider preference order
pub fn default_preference() -> Vec<ProviderKind> {
    ProviderKind::ALL.to_vec()
}

/// Whether the model belongs to the slow reasoning tier of its provider
pub fn is_deep_reasoning(provider: ProviderKind, model: &str) -> bool {
    provider
        .find_model(model)
        .map(|spec| spec.deep_reasoning)
        .unwrap_or(false)
}
