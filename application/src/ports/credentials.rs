//! Provider credential port

use newsroom_domain::ProviderKind;

/// Source of provider API keys, read at call time
pub trait CredentialSource: Send + Sync {
    fn api_key(&self, provider: ProviderKind) -> Option<String>;

    fn has_credential(&self, provider: ProviderKind) -> bool {
        self.api_key(provider).is_some_and(|k| !k.trim().is_empty())
    }
}
