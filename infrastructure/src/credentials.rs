//! Provider credentials from the environment
//!
//! Keys are looked up on every call so a rotated or newly exported key is
//! picked up without a restart.

use crate::config::FileProvidersConfig;
use newsroom_application::CredentialSource;
use newsroom_domain::ProviderKind;
use std::collections::HashMap;

pub struct EnvCredentials {
    env_vars: HashMap<ProviderKind, String>,
    inline: HashMap<ProviderKind, String>,
}

impl EnvCredentials {
    pub fn from_config(providers: &FileProvidersConfig) -> Self {
        let mut env_vars = HashMap::new();
        let mut inline = HashMap::new();
        for kind in ProviderKind::ALL {
            env_vars.insert(kind, providers.api_key_env(kind));
            if let Some(key) = providers.inline_api_key(kind) {
                inline.insert(kind, key.to_string());
            }
        }
        Self { env_vars, inline }
    }

    /// Name of the environment variable consulted for `provider`
    pub fn env_var(&self, provider: ProviderKind) -> Option<&str> {
        self.env_vars.get(&provider).map(String::as_str)
    }
}

impl CredentialSource for EnvCredentials {
    fn api_key(&self, provider: ProviderKind) -> Option<String> {
        if let Some(key) = self.inline.get(&provider) {
            return Some(key.clone());
        }
        let var = self.env_vars.get(&provider)?;
        std::env::var(var).ok().filter(|v| !v.trim().is_empty())
    }
}
