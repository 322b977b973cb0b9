//! Persona and agent configuration entities

use crate::call::CallOverride;
use crate::core::error::DomainError;
use crate::providers::ProviderKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;
pub const MIN_MAX_TOKENS: u32 = 100;
pub const MAX_MAX_TOKENS: u32 = 4096;
const FALLBACK_TEMPERATURE: f32 = 0.7;

/// A member of the broadcast team (read from the roster, never owned here)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub emoji: String,
}

impl Persona {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        color: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            color: color.into(),
            emoji: emoji.into(),
        }
    }

    /// `"🎧 Name (Role)"`, used for transcript attribution in prompts
    pub fn label(&self) -> String {
        if self.emoji.is_empty() {
            format!("{} ({})", self.name, self.role)
        } else {
            format!("{} {} ({})", self.emoji, self.name, self.role)
        }
    }
}

/// Per-persona AI configuration plus rolling call statistics (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub agent_id: String,
    pub provider: ProviderKind,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub enabled: bool,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_calls: u64,
    #[serde(default)]
    pub avg_response_ms: u64,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_agent_handle: Option<String>,
}

impl AgentConfig {
    pub fn new(
        agent_id: impl Into<String>,
        provider: ProviderKind,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            provider,
            model: model.into(),
            temperature,
            max_tokens,
            enabled: true,
            last_used_at: None,
            total_calls: 0,
            avg_response_ms: 0,
            last_error: None,
            provider_agent_handle: None,
        }
        .clamped()
    }

    /// Force temperature and token budget into their legal ranges
    pub fn clamped(mut self) -> Self {
        self.temperature = clamp_temperature(self.temperature);
        self.max_tokens = clamp_max_tokens(self.max_tokens);
        self
    }

    /// Merge a partial update.
    ///
    /// `agent_id` is never touched. Changing the provider without naming a
    /// model moves the config onto that provider's fallback model.
    pub fn apply_patch(&mut self, patch: &AgentConfigPatch) -> Result<(), DomainError> {
        let provider = patch.provider.unwrap_or(self.provider);
        let model = match (&patch.model, patch.provider) {
            (Some(model), _) => model.clone(),
            (None, Some(new)) if new != self.provider => new.fallback_model().to_string(),
            (None, _) => self.model.clone(),
        };
        let spec = provider.validate_model(&model)?;

        let handle = match &patch.provider_agent_handle {
            Some(h) if h.trim().is_empty() => None,
            Some(h) => Some(h.trim().to_string()),
            None => self.provider_agent_handle.clone(),
        };
        if spec.custom_agent && handle.is_none() {
            return Err(DomainError::InvalidInput(format!(
                "model '{}' requires providerAgentHandle",
                spec.id
            )));
        }

        self.provider = provider;
        self.model = model;
        self.provider_agent_handle = handle;
        if let Some(t) = patch.temperature {
            self.temperature = t;
        }
        if let Some(m) = patch.max_tokens {
            self.max_tokens = m.min(u32::MAX as u64) as u32;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        self.temperature = clamp_temperature(self.temperature);
        self.max_tokens = clamp_max_tokens(self.max_tokens);
        Ok(())
    }

    /// Produce the effective config for one call with an override on top
    pub fn with_override(&self, call_override: &CallOverride) -> Result<AgentConfig, DomainError> {
        let mut effective = self.clone();
        let patch = AgentConfigPatch {
            provider: call_override.provider,
            model: call_override.model.clone(),
            temperature: call_override.temperature,
            max_tokens: call_override.max_tokens.map(u64::from),
            enabled: None,
            provider_agent_handle: None,
        };
        effective.apply_patch(&patch)?;
        Ok(effective)
    }

    /// Telemetry update after one call attempt.
    ///
    /// `avg_response_ms` is an incremental running mean over `total_calls`.
    pub fn record_call(&mut self, at: DateTime<Utc>, duration_ms: u64, error: Option<String>) {
        self.last_used_at = Some(at);
        self.total_calls += 1;
        let n = self.total_calls;
        self.avg_response_ms = if n == 1 {
            duration_ms
        } else {
            ((self.avg_response_ms as f64 * (n - 1) as f64 + duration_ms as f64) / n as f64)
                .round() as u64
        };
        self.last_error = error;
    }
}

/// Partial update of an [`AgentConfig`]; absent fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfigPatch {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    /// Wide integer so out-of-range input is clamped rather than rejected
    pub max_tokens: Option<u64>,
    pub enabled: Option<bool>,
    /// Empty string clears the handle
    pub provider_agent_handle: Option<String>,
}

pub fn clamp_temperature(t: f32) -> f32 {
    if t.is_nan() {
        FALLBACK_TEMPERATURE
    } else {
        t.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
    }
}

pub fn clamp_max_tokens(m: u32) -> u32 {
    m.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS)
}
