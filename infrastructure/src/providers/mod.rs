//! Provider adapters, one per [`ProviderKind`]
//!
//! All provider-specific wire handling lives here; nothing above this module
//! branches on the provider.

pub mod anthropic;
pub mod gemini;
pub mod http;
pub mod mistral;
pub mod openai_compat;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use http::http_client;
pub use mistral::MistralAdapter;
pub use openai_compat::OpenAiCompatAdapter;

use crate::config::FileProvidersConfig;
use newsroom_application::ProviderAdapter;
use newsroom_domain::ProviderKind;
use reqwest::Client;
use std::sync::Arc;

/// Adapter for `kind`, pointed at the configured base URL
pub fn adapter_for(
    kind: ProviderKind,
    client: Client,
    providers: &FileProvidersConfig,
) -> Arc<dyn ProviderAdapter> {
    let base_url = providers.base_url(kind);
    match kind {
        ProviderKind::Anthropic => Arc::new(AnthropicAdapter::new(client, base_url)),
        ProviderKind::OpenRouter => Arc::new(OpenAiCompatAdapter::openrouter(client, base_url)),
        ProviderKind::Gemini => Arc::new(GeminiAdapter::new(client, base_url)),
        ProviderKind::Mistral => Arc::new(MistralAdapter::new(client, base_url)),
        ProviderKind::Kimi => Arc::new(OpenAiCompatAdapter::kimi(client, base_url)),
    }
}

/// Every adapter, sharing one HTTP client
pub fn build_adapters(
    client: &Client,
    providers: &FileProvidersConfig,
) -> Vec<Arc<dyn ProviderAdapter>> {
    ProviderKind::ALL
        .iter()
        .map(|kind| adapter_for(*kind, client.clone(), providers))
        .collect()
}
