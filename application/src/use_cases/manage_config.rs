//! Agent configuration management
//!
//! Reads resolve stored overrides over the compiled defaults. Roster
//! members without a compiled default start from the generic baseline.

use crate::ports::kv_store::StoreError;
use crate::ports::roster::RosterSource;
use crate::stores::AgentConfigStore;
use crate::use_cases::call_ai::CallRouter;
use newsroom_domain::persona::defaults::{generic_config, known_persona_ids};
use newsroom_domain::{
    AgentConfig, AgentConfigPatch, CallResult, DomainError, Message, ModelSpec, PromptTemplate,
    ProviderKind,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigStoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// One provider's entry in the model catalogue
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderModels {
    pub provider: ProviderKind,
    pub display_name: &'static str,
    pub has_credential: bool,
    pub models: &'static [ModelSpec],
}

pub struct ManageConfigUseCase {
    configs: AgentConfigStore,
    roster: Arc<dyn RosterSource>,
    router: Arc<CallRouter>,
}

impl ManageConfigUseCase {
    pub fn new(
        configs: AgentConfigStore,
        roster: Arc<dyn RosterSource>,
        router: Arc<CallRouter>,
    ) -> Self {
        Self {
            configs,
            roster,
            router,
        }
    }

    pub async fn get_config(&self, persona_id: &str) -> Result<AgentConfig, ConfigStoreError> {
        if let Some(config) = self.configs.resolve(persona_id).await? {
            return Ok(config);
        }
        let team = self.roster.team().await?;
        if team.iter().any(|p| p.id == persona_id) {
            return Ok(generic_config(persona_id));
        }
        Err(DomainError::UnknownPersona(persona_id.to_string()).into())
    }

    /// One config per roster member, in roster order
    pub async fn list_configs(&self) -> Result<Vec<AgentConfig>, ConfigStoreError> {
        let team = self.roster.team().await?;
        let ids: Vec<String> = if team.is_empty() {
            known_persona_ids().map(str::to_string).collect()
        } else {
            team.into_iter().map(|p| p.id).collect()
        };
        let mut configs = Vec::with_capacity(ids.len());
        for id in &ids {
            configs.push(self.get_config(id).await?);
        }
        Ok(configs)
    }

    /// Merge, clamp and validate a partial update, then persist it
    pub async fn update_config(
        &self,
        persona_id: &str,
        patch: &AgentConfigPatch,
    ) -> Result<AgentConfig, ConfigStoreError> {
        let mut config = self.get_config(persona_id).await?;
        config.apply_patch(patch)?;
        self.configs.save(&config).await?;
        info!(
            persona = %persona_id,
            provider = %config.provider,
            model = %config.model,
            enabled = config.enabled,
            "Agent config updated"
        );
        Ok(config)
    }

    /// Drop the stored override; returns the config now in effect
    pub async fn reset_config(&self, persona_id: &str) -> Result<AgentConfig, ConfigStoreError> {
        self.get_config(persona_id).await?;
        if self.configs.reset(persona_id).await? {
            info!(persona = %persona_id, "Agent config reset");
        }
        self.get_config(persona_id).await
    }

    /// One short routed call with a fixed ping prompt
    pub async fn test_connection(&self, persona_id: &str) -> CallResult {
        self.router
            .call(
                persona_id,
                PromptTemplate::connection_test_system(),
                &[Message::user(PromptTemplate::connection_test_prompt())],
                None,
            )
            .await
    }

    pub fn list_models(&self) -> Vec<ProviderModels> {
        ProviderKind::ALL
            .into_iter()
            .map(|provider| ProviderModels {
                provider,
                display_name: provider.display_name(),
                has_credential: self.router.has_credential(provider),
                models: provider.models(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider::ProviderAdapter;
    use crate::testing::{MemoryStore, ScriptedAdapter, StaticCredentials, StaticRoster};
    use newsroom_domain::Persona;
    use newsroom_domain::persona::defaults::{default_config, default_team};

    fn use_case(credentials: StaticCredentials) -> (ManageConfigUseCase, AgentConfigStore) {
        let store = Arc::new(MemoryStore::default());
        let configs = AgentConfigStore::new(store);
        let mut team = default_team();
        team.push(Persona::new("intern", "Kim", "Intern", "#000", ""));
        let roster: Arc<dyn RosterSource> = Arc::new(StaticRoster(team));
        let router = Arc::new(
            CallRouter::new(
                vec![Arc::new(ScriptedAdapter::new(ProviderKind::Anthropic)) as Arc<dyn ProviderAdapter>],
                Arc::new(credentials),
                configs.clone(),
            )
            .with_roster(roster.clone()),
        );
        (ManageConfigUseCase::new(configs.clone(), roster, router), configs)
    }

    #[tokio::test]
    async fn test_get_config_defaults_on_miss() {
        let (uc, _) = use_case(StaticCredentials::none());
        let config = uc.get_config("host").await.unwrap();
        assert_eq!(config, default_config("host").unwrap());
        assert_eq!(config.agent_id, "host");

        let intern = uc.get_config("intern").await.unwrap();
        assert_eq!(intern.agent_id, "intern");
        assert_eq!(intern.provider, ProviderKind::Anthropic);

        assert!(matches!(
            uc.get_config("ghost").await,
            Err(ConfigStoreError::Domain(DomainError::UnknownPersona(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_clamps_and_persists() {
        let (uc, configs) = use_case(StaticCredentials::none());
        let updated = uc
            .update_config(
                "host",
                &AgentConfigPatch {
                    temperature: Some(3.5),
                    max_tokens: Some(50_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.temperature, 2.0);
        assert_eq!(updated.max_tokens, 4096);
        assert_eq!(configs.stored("host").await.unwrap(), Some(updated));

        let low = uc
            .update_config(
                "host",
                &AgentConfigPatch {
                    temperature: Some(-1.0),
                    max_tokens: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(low.temperature, 0.0);
        assert_eq!(low.max_tokens, 100);
    }

    #[tokio::test]
    async fn test_update_rejects_bad_model_pairing() {
        let (uc, configs) = use_case(StaticCredentials::none());
        let err = uc
            .update_config(
                "host",
                &AgentConfigPatch {
                    provider: Some(ProviderKind::Mistral),
                    model: Some("gpt-4o".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigStoreError::Domain(DomainError::InvalidModel { .. })
        ));
        assert_eq!(configs.stored("host").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset_restores_default() {
        let (uc, _) = use_case(StaticCredentials::none());
        uc.update_config(
            "analyst",
            &AgentConfigPatch {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let config = uc.reset_config("analyst").await.unwrap();
        assert!(config.enabled);
        assert_eq!(config, default_config("analyst").unwrap());
    }

    #[tokio::test]
    async fn test_list_configs_covers_roster() {
        let (uc, _) = use_case(StaticCredentials::none());
        let configs = uc.list_configs().await.unwrap();
        assert_eq!(configs.len(), default_team().len() + 1);
        assert_eq!(configs.last().unwrap().agent_id, "intern");
    }

    #[tokio::test]
    async fn test_connection_reports_result() {
        let (uc, configs) = use_case(StaticCredentials::only(&[ProviderKind::Anthropic]));
        let ok = uc.test_connection("producer").await;
        assert_eq!(ok.text(), Some("anthropic says hello"));
        assert_eq!(configs.resolve("producer").await.unwrap().unwrap().total_calls, 1);

        let (offline, _) = use_case(StaticCredentials::none());
        let failed = offline.test_connection("producer").await;
        assert!(!failed.is_success());
        assert!(failed.error().is_some());
    }

    #[tokio::test]
    async fn test_connection_for_roster_member_without_default() {
        let (uc, configs) = use_case(StaticCredentials::all());
        let config = uc.get_config("intern").await.unwrap();
        let result = uc.test_connection("intern").await;
        assert!(result.is_success());
        assert_eq!(result.provider, Some(config.provider));
        assert_eq!(result.model, config.model);

        let stored = configs.stored("intern").await.unwrap().unwrap();
        assert_eq!(stored.total_calls, 1);
        assert_eq!(uc.get_config("intern").await.unwrap().total_calls, 1);
    }

    #[test]
    fn test_list_models_flags_credentials() {
        let (uc, _) = use_case(StaticCredentials::only(&[ProviderKind::Gemini]));
        let models = uc.list_models();
        assert_eq!(models.len(), ProviderKind::ALL.len());
        for entry in models {
            assert_eq!(entry.has_credential, entry.provider == ProviderKind::Gemini);
            assert!(!entry.models.is_empty());
        }
    }
}
