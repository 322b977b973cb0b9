//! Call Router use case
//!
//! Resolves a persona's configuration, invokes the matching provider
//! adapter and runs the fallback chain:
//!
//! 1. primary provider/model
//! 2. same-provider downgrade (once)
//! 3. first other provider in preference order that has a credential (once)
//!
//! A persona resolves to its stored config, else its compiled default, else
//! the generic baseline when it is a roster member.
//!
//! `call` never fails. Every outcome, including configuration problems, is
//! a [`CallResult`]; this is the only place adapter errors are converted.

use crate::config::RouterParams;
use crate::ports::credentials::CredentialSource;
use crate::ports::kv_store::StoreError;
use crate::ports::provider::{ProviderAdapter, ProviderError, ProviderRequest};
use crate::ports::roster::RosterSource;
use crate::stores::AgentConfigStore;
use chrono::Utc;
use newsroom_domain::persona::defaults::{default_config, generic_config};
use newsroom_domain::providers::downgrade_for;
use newsroom_domain::{
    AgentConfig, CallFailure, CallOverride, CallResult, FailureKind, Message, ProviderKind,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Routes persona calls to provider adapters
pub struct CallRouter {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
    credentials: Arc<dyn CredentialSource>,
    configs: AgentConfigStore,
    roster: Option<Arc<dyn RosterSource>>,
    params: RouterParams,
}

/// Outcome of a single adapter attempt inside the chain
enum Attempt {
    Done(CallResult),
    Failed(ProviderError),
}

impl CallRouter {
    pub fn new(
        adapters: Vec<Arc<dyn ProviderAdapter>>,
        credentials: Arc<dyn CredentialSource>,
        configs: AgentConfigStore,
    ) -> Self {
        Self {
            adapters: adapters.into_iter().map(|a| (a.kind(), a)).collect(),
            credentials,
            configs,
            roster: None,
            params: RouterParams::default(),
        }
    }

    pub fn with_params(mut self, params: RouterParams) -> Self {
        self.params = params;
        self
    }

    /// Lets roster members without a compiled default be routed
    pub fn with_roster(mut self, roster: Arc<dyn RosterSource>) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn params(&self) -> &RouterParams {
        &self.params
    }

    pub fn has_credential(&self, provider: ProviderKind) -> bool {
        self.credentials.has_credential(provider)
    }

    /// `callAI(personaId, systemPrompt, messages, override?)`
    pub async fn call(
        &self,
        persona_id: &str,
        system_prompt: &str,
        messages: &[Message],
        call_override: Option<&CallOverride>,
    ) -> CallResult {
        let stored = match self.resolve(persona_id).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                warn!(persona = %persona_id, "Call for unknown persona");
                return CallResult::failure(
                    None,
                    "",
                    0,
                    CallFailure::new(
                        FailureKind::Config,
                        format!("unknown persona '{persona_id}'"),
                    ),
                );
            }
            Err(e) => {
                warn!(persona = %persona_id, "Config store unavailable, using default: {}", e);
                match default_config(persona_id) {
                    Some(config) => config,
                    None => {
                        return CallResult::failure(
                            None,
                            "",
                            0,
                            CallFailure::new(FailureKind::Config, e.to_string()),
                        );
                    }
                }
            }
        };

        let result = self
            .route(&stored, system_prompt, messages, call_override)
            .await;

        if let Err(e) = self
            .configs
            .record_call(
                &stored,
                Utc::now(),
                result.duration_ms,
                result.error().map(str::to_string),
            )
            .await
        {
            warn!(persona = %persona_id, "Failed to record call telemetry: {}", e);
        }

        result
    }

    /// Stored, then compiled default, then generic for roster members
    async fn resolve(&self, persona_id: &str) -> Result<Option<AgentConfig>, StoreError> {
        if let Some(config) = self.configs.resolve(persona_id).await? {
            return Ok(Some(config));
        }
        let Some(roster) = &self.roster else {
            return Ok(None);
        };
        let team = roster.team().await?;
        Ok(team
            .iter()
            .any(|p| p.id == persona_id)
            .then(|| generic_config(persona_id)))
    }

    async fn route(
        &self,
        stored: &AgentConfig,
        system_prompt: &str,
        messages: &[Message],
        call_override: Option<&CallOverride>,
    ) -> CallResult {
        let config = match call_override {
            Some(o) => match stored.with_override(o) {
                Ok(config) => config,
                Err(e) => return config_failure(stored, e.to_string()),
            },
            None => stored.clone(),
        };
        if let Err(e) = config.provider.validate_model(&config.model) {
            return config_failure(&config, e.to_string());
        }
        if !config.enabled {
            info!(persona = %config.agent_id, "Persona is disabled, not calling");
            return CallResult::failure(
                Some(config.provider),
                config.model.clone(),
                0,
                CallFailure::new(
                    FailureKind::Disabled,
                    format!("persona '{}' is disabled", config.agent_id),
                ),
            );
        }

        let started = Instant::now();
        let primary = config.provider;
        let mut reasons: Vec<String> = Vec::new();
        let mut attempted = false;

        // 1-2. Primary, then same-provider downgrade
        match self.api_key(primary) {
            None => {
                info!(persona = %config.agent_id, provider = %primary, "No credential, skipping to cross-provider fallback");
                reasons.push(format!("{primary}: key missing"));
            }
            Some(key) => {
                attempted = true;
                match self
                    .attempt(primary, &key, &config.model, &config, system_prompt, messages, started)
                    .await
                {
                    Attempt::Done(result) => return result,
                    Attempt::Failed(e) => reasons.push(format!("{primary}/{}: {e}", config.model)),
                }

                if let Some(downgrade) = downgrade_for(primary, &config.model) {
                    info!(
                        persona = %config.agent_id,
                        provider = %primary,
                        from = %config.model,
                        to = %downgrade,
                        "Trying same-provider downgrade"
                    );
                    match self
                        .attempt(primary, &key, downgrade, &config, system_prompt, messages, started)
                        .await
                    {
                        Attempt::Done(result) => return result,
                        Attempt::Failed(e) => reasons.push(format!("{primary}/{downgrade}: {e}")),
                    }
                }
            }
        }

        // 3. Cross-provider fallback
        let fallback = self.params.preference.iter().copied().find(|p| {
            *p != primary && self.adapters.contains_key(p) && self.credentials.has_credential(*p)
        });
        match fallback.and_then(|p| self.api_key(p).map(|key| (p, key))) {
            Some((provider, key)) => {
                attempted = true;
                let model = provider.fallback_model();
                warn!(
                    persona = %config.agent_id,
                    from = %primary,
                    to = %provider,
                    model = %model,
                    "Falling back to another provider"
                );
                match self
                    .attempt(provider, &key, model, &config, system_prompt, messages, started)
                    .await
                {
                    Attempt::Done(result) => return result,
                    Attempt::Failed(e) => reasons.push(format!("{provider}/{model}: {e}")),
                }
            }
            None => reasons.push("no fallback provider available".to_string()),
        }

        let kind = if attempted {
            FailureKind::Exhausted
        } else {
            FailureKind::KeyMissing
        };
        warn!(persona = %config.agent_id, "All providers failed: {}", reasons.join("; "));
        CallResult::failure(
            Some(primary),
            config.model.clone(),
            elapsed_ms(started),
            CallFailure::new(kind, reasons.join("; ")),
        )
    }

    /// One adapter call with the model's timeout. A safety block ends the
    /// whole chain; every other error lets the caller continue.
    #[allow(clippy::too_many_arguments)]
    async fn attempt(
        &self,
        provider: ProviderKind,
        api_key: &str,
        model: &str,
        config: &AgentConfig,
        system_prompt: &str,
        messages: &[Message],
        started: Instant,
    ) -> Attempt {
        let Some(adapter) = self.adapters.get(&provider) else {
            return Attempt::Failed(ProviderError::InvalidRequest(format!(
                "no adapter registered for {provider}"
            )));
        };

        let custom_agent = provider
            .find_model(model)
            .is_some_and(|spec| spec.custom_agent);
        let request = ProviderRequest {
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            messages: messages.to_vec(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            agent_handle: if custom_agent {
                config.provider_agent_handle.clone()
            } else {
                None
            },
        };

        let timeout = self.params.timeout_for(provider, model);
        debug!(persona = %config.agent_id, provider = %provider, model = %model, ?timeout, "Calling provider");

        let outcome = match tokio::time::timeout(timeout, adapter.send(&request)).await {
            Ok(Ok(text)) if text.trim().is_empty() => Err(ProviderError::EmptyResponse),
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(timeout)),
        };

        match outcome {
            Ok(text) => {
                info!(
                    persona = %config.agent_id,
                    provider = %provider,
                    model = %model,
                    duration_ms = elapsed_ms(started),
                    "Provider call succeeded"
                );
                Attempt::Done(CallResult::success(
                    provider,
                    model,
                    elapsed_ms(started),
                    text,
                ))
            }
            Err(e) if e.kind() == FailureKind::SafetyBlocked => {
                warn!(persona = %config.agent_id, provider = %provider, model = %model, "Blocked by safety filter");
                Attempt::Done(CallResult::failure(
                    Some(provider),
                    model,
                    elapsed_ms(started),
                    CallFailure::new(FailureKind::SafetyBlocked, e.to_string()),
                ))
            }
            Err(e) => {
                warn!(persona = %config.agent_id, provider = %provider, model = %model, kind = ?e.kind(), "Provider call failed: {}", e);
                Attempt::Failed(e)
            }
        }
    }

    fn api_key(&self, provider: ProviderKind) -> Option<String> {
        if !self.adapters.contains_key(&provider) {
            return None;
        }
        self.credentials
            .api_key(provider)
            .filter(|k| !k.trim().is_empty())
    }
}

fn config_failure(config: &AgentConfig, message: String) -> CallResult {
    warn!(persona = %config.agent_id, "Rejected call before reaching a provider: {}", message);
    CallResult::failure(
        Some(config.provider),
        config.model.clone(),
        0,
        CallFailure::new(FailureKind::Config, message),
    )
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
