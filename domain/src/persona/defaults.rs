//! Compiled-in persona defaults.
//!
//! The store only ever holds overrides of these values; a persona with no
//! stored config behaves exactly as listed here.

use super::entities::{AgentConfig, Persona};
use crate::providers::ProviderKind;

/// The persona that synthesizes sessions, plans tasks and compiles analyses
pub const COORDINATOR_ID: &str = "producer";

/// `(id, provider, model, temperature, max_tokens)`
const DEFAULTS: &[(&str, ProviderKind, &str, f32, u32)] = &[
    (COORDINATOR_ID, ProviderKind::Anthropic, "claude-sonnet-4-5", 0.7, 2048),
    ("music_editor", ProviderKind::Gemini, "gemini-2.5-flash", 0.9, 1024),
    ("news_editor", ProviderKind::OpenRouter, "openai/gpt-4o-mini", 0.5, 1024),
    ("host", ProviderKind::Kimi, "kimi-k2-0905-preview", 1.0, 1024),
    ("sound_engineer", ProviderKind::Mistral, "mistral-large-latest", 0.4, 1024),
    ("marketing", ProviderKind::OpenRouter, "meta-llama/llama-3.3-70b-instruct", 0.9, 1024),
    ("analyst", ProviderKind::Gemini, "gemini-2.5-pro", 0.3, 2048),
];

/// Compiled default config for a persona, `None` for unknown ids
pub fn default_config(agent_id: &str) -> Option<AgentConfig> {
    DEFAULTS
        .iter()
        .find(|(id, ..)| *id == agent_id)
        .map(|(id, provider, model, temperature, max_tokens)| {
            AgentConfig::new(*id, *provider, *model, *temperature, *max_tokens)
        })
}

/// Baseline for a roster member that has no compiled default
pub fn generic_config(agent_id: &str) -> AgentConfig {
    AgentConfig::new(agent_id, ProviderKind::Anthropic, "claude-sonnet-4-5", 0.7, 1024)
}

/// Ids of every persona with a compiled default, coordinator first
pub fn known_persona_ids() -> impl Iterator<Item = &'static str> {
    DEFAULTS.iter().map(|(id, ..)| *id)
}

pub fn is_known_persona(agent_id: &str) -> bool {
    known_persona_ids().any(|id| id == agent_id)
}

/// The station's standard team, used to seed an empty roster
pub fn default_team() -> Vec<Persona> {
    vec![
        Persona::new(COORDINATOR_ID, "Vera", "Executive producer", "#e11d48", "🎬"),
        Persona::new("music_editor", "Mark", "Music editor", "#7c3aed", "🎧"),
        Persona::new("news_editor", "Nadia", "News editor", "#0284c7", "📰"),
        Persona::new("host", "Leo", "Morning host", "#f59e0b", "🎙️"),
        Persona::new("sound_engineer", "Igor", "Sound engineer", "#475569", "🎛️"),
        Persona::new("marketing", "Sasha", "Marketing lead", "#16a34a", "📣"),
        Persona::new("analyst", "Dana", "Audience analyst", "#0d9488", "📊"),
    ]
}
