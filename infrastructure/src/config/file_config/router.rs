//! Call routing configuration (`[router]` section)

use super::ConfigValidationError;
use newsroom_application::RouterParams;
use newsroom_domain::ProviderKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRouterConfig {
    /// Per-attempt timeout for ordinary models
    pub base_timeout_secs: u64,
    /// Per-attempt timeout for deep-reasoning models
    pub deep_timeout_secs: u64,
    /// Cross-provider fallback order
    pub preference: Vec<String>,
}

impl Default for FileRouterConfig {
    fn default() -> Self {
        let params = RouterParams::default();
        Self {
            base_timeout_secs: params.base_timeout.as_secs(),
            deep_timeout_secs: params.deep_timeout.as_secs(),
            preference: params
                .preference
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
        }
    }
}

impl FileRouterConfig {
    pub fn parse_preference(&self) -> Result<Vec<ProviderKind>, ConfigValidationError> {
        let mut kinds = Vec::with_capacity(self.preference.len());
        for name in &self.preference {
            let kind: ProviderKind = name
                .parse()
                .map_err(|_| ConfigValidationError::UnknownProvider(name.clone()))?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            return Err(ConfigValidationError::EmptyPreference);
        }
        Ok(kinds)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.base_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout("router.base_timeout_secs"));
        }
        if self.deep_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout("router.deep_timeout_secs"));
        }
        self.parse_preference().map(|_| ())
    }

    pub fn to_router_params(&self) -> Result<RouterParams, ConfigValidationError> {
        self.validate()?;
        Ok(RouterParams::default()
            .with_base_timeout(Duration::from_secs(self.base_timeout_secs))
            .with_deep_timeout(Duration::from_secs(self.deep_timeout_secs))
            .with_preference(self.parse_preference()?))
    }
}
