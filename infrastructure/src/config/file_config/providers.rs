//! Provider configuration from TOML (`[providers]` section)

use crate::providers::{anthropic, gemini, mistral, openai_compat};
use newsroom_domain::ProviderKind;
use serde::{Deserialize, Serialize};

/// Settings for one AI backend. Unset fields fall back to the provider's
/// built-in values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended, use the env var instead).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the provider API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub anthropic: FileProviderConfig,
    pub openrouter: FileProviderConfig,
    pub gemini: FileProviderConfig,
    pub mistral: FileProviderConfig,
    pub kimi: FileProviderConfig,
}

impl FileProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &FileProviderConfig {
        match kind {
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Mistral => &self.mistral,
            ProviderKind::Kimi => &self.kimi,
        }
    }

    pub fn api_key_env(&self, kind: ProviderKind) -> String {
        self.get(kind)
            .api_key_env
            .clone()
            .unwrap_or_else(|| default_api_key_env(kind).to_string())
    }

    pub fn inline_api_key(&self, kind: ProviderKind) -> Option<&str> {
        self.get(kind)
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self, kind: ProviderKind) -> String {
        self.get(kind)
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(kind).to_string())
    }
}

pub fn default_api_key_env(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        ProviderKind::Gemini => "GEMINI_API_KEY",
        ProviderKind::Mistral => "MISTRAL_API_KEY",
        ProviderKind::Kimi => "KIMI_API_KEY",
    }
}

fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Anthropic => anthropic::DEFAULT_BASE_URL,
        ProviderKind::OpenRouter => openai_compat::OPENROUTER_BASE_URL,
        ProviderKind::Gemini => gemini::DEFAULT_BASE_URL,
        ProviderKind::Mistral => mistral::DEFAULT_BASE_URL,
        ProviderKind::Kimi => openai_compat::KIMI_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[gemini]
api_key_env = "GOOGLE_KEY"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key_env(ProviderKind::Gemini), "GOOGLE_KEY");
        assert_eq!(
            config.base_url(ProviderKind::Gemini),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(
            config.api_key_env(ProviderKind::Anthropic),
            "ANTHROPIC_API_KEY"
        );
        assert_eq!(
            config.base_url(ProviderKind::Kimi),
            "https://api.moonshot.ai/v1"
        );
    }

    #[test]
    fn test_blank_inline_key_is_ignored() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[mistral]
api_key = "  "

[kimi]
api_key = "sk-kimi"
"#,
        )
        .unwrap();
        assert_eq!(config.inline_api_key(ProviderKind::Mistral), None);
        assert_eq!(config.inline_api_key(ProviderKind::Kimi), Some("sk-kimi"));
    }
}
