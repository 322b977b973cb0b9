//! Router parameters: call timeouts and cross-provider preference.
//!
//! These are application-layer concerns; the values are loaded from the
//! `[router]` config section by the infrastructure layer.

use newsroom_domain::ProviderKind;
use newsroom_domain::providers::{default_preference, is_deep_reasoning};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterParams {
    /// Per-attempt timeout for ordinary models
    pub base_timeout: Duration,
    /// Per-attempt timeout for deep-reasoning models
    pub deep_timeout: Duration,
    /// Order in which providers are tried for cross-provider fallback
    pub preference: Vec<ProviderKind>,
}

impl Default for RouterParams {
    fn default() -> Self {
        Self {
            base_timeout: Duration::from_secs(30),
            deep_timeout: Duration::from_secs(60),
            preference: default_preference(),
        }
    }
}

impl RouterParams {
    // ==================== Builder Methods ====================

    pub fn with_base_timeout(mut self, timeout: Duration) -> Self {
        self.base_timeout = timeout;
        self
    }

    pub fn with_deep_timeout(mut self, timeout: Duration) -> Self {
        self.deep_timeout = timeout;
        self
    }

    pub fn with_preference(mut self, preference: Vec<ProviderKind>) -> Self {
        self.preference = preference;
        self
    }

    // ==================== Query Methods ====================

    pub fn timeout_for(&self, provider: ProviderKind, model: &str) -> Duration {
        if is_deep_reasoning(provider, model) {
            self.deep_timeout
        } else {
            self.base_timeout
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = RouterParams::default();
        assert_eq!(params.base_timeout, Duration::from_secs(30));
        assert_eq!(params.deep_timeout, Duration::from_secs(60));
        assert_eq!(params.preference.len(), 5);
    }

    #[test]
    fn test_deep_models_get_longer_timeout() {
        let params = RouterParams::default();
        assert_eq!(
            params.timeout_for(ProviderKind::Gemini, "gemini-2.5-pro"),
            Duration::from_secs(60)
        );
        assert_eq!(
            params.timeout_for(ProviderKind::Kimi, "kimi-k2-thinking"),
            Duration::from_secs(60)
        );
        assert_eq!(
            params.timeout_for(ProviderKind::Anthropic, "claude-opus-4-1"),
            Duration::from_secs(60)
        );
        assert_eq!(
            params.timeout_for(ProviderKind::Gemini, "gemini-2.5-flash"),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_builder() {
        let params = RouterParams::default()
            .with_base_timeout(Duration::from_millis(50))
            .with_preference(vec![ProviderKind::Kimi]);
        assert_eq!(params.base_timeout, Duration::from_millis(50));
        assert_eq!(params.preference, vec![ProviderKind::Kimi]);
    }
}
