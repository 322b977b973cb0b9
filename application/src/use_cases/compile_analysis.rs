//! Compiled cross-agent analysis
//!
//! Every non-coordinator persona is asked in parallel about its own area;
//! the coordinator then merges the answers into one categorized report.
//! Failed calls at either stage are replaced by template text, so the
//! operation only fails on store or roster errors.

use crate::ports::kv_store::StoreError;
use crate::ports::roster::RosterSource;
use crate::stores::SettingsRepository;
use crate::use_cases::call_ai::CallRouter;
use chrono::Utc;
use newsroom_domain::parsing::parse_analysis;
use newsroom_domain::persona::defaults::default_team;
use newsroom_domain::script::templates::{
    template_analysis, template_categories, template_contribution,
};
use newsroom_domain::{
    AnalysisDraft, COORDINATOR_ID, CompiledAnalysis, DomainError, Message, Persona,
    PersonaContribution, PromptTemplate,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct CompileAnalysisUseCase {
    router: Arc<CallRouter>,
    roster: Arc<dyn RosterSource>,
    settings: SettingsRepository,
}

impl CompileAnalysisUseCase {
    pub fn new(
        router: Arc<CallRouter>,
        roster: Arc<dyn RosterSource>,
        settings: SettingsRepository,
    ) -> Self {
        Self {
            router,
            roster,
            settings,
        }
    }

    /// The most recently compiled analysis, if any
    pub async fn latest(&self) -> Result<Option<CompiledAnalysis>, AnalysisError> {
        Ok(self.settings.latest_analysis().await?)
    }

    pub async fn execute(&self) -> Result<CompiledAnalysis, AnalysisError> {
        let team = self.roster.team().await?;
        if team.is_empty() {
            return Err(DomainError::TeamNotInitialized.into());
        }
        let members: Vec<Persona> = team
            .iter()
            .filter(|p| p.id != COORDINATOR_ID)
            .cloned()
            .collect();

        info!(members = members.len(), "Phase 1: Persona analyses");
        let contributions = self.gather(&members).await;

        info!("Phase 2: Coordinator merge");
        let (draft, is_ai_generated) = self.merge(&team, &contributions).await;

        let analysis = CompiledAnalysis::new(
            Uuid::new_v4().to_string(),
            draft,
            contributions,
            is_ai_generated,
            Utc::now(),
        );
        self.settings.save_analysis(&analysis).await?;
        info!(analysis_id = %analysis.id, is_ai_generated, "Analysis compiled");
        Ok(analysis)
    }

    /// One call per member, in parallel; results keep roster order
    async fn gather(&self, members: &[Persona]) -> Vec<PersonaContribution> {
        let mut contributions: Vec<PersonaContribution> = members
            .iter()
            .map(|p| PersonaContribution {
                persona_id: p.id.clone(),
                persona_name: p.name.clone(),
                text: template_contribution(&p.name, &p.id),
                is_ai_generated: false,
            })
            .collect();

        let mut join_set = JoinSet::new();
        for (index, persona) in members.iter().enumerate() {
            let router = Arc::clone(&self.router);
            let persona = persona.clone();
            join_set.spawn(async move {
                let system = PromptTemplate::analysis_system(&persona);
                let prompt = PromptTemplate::analysis_request(&persona);
                let result = router
                    .call(&persona.id, &system, &[Message::user(prompt)], None)
                    .await;
                (index, persona.id, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, persona_id, result)) => match result.text() {
                    Some(text) => {
                        debug!(persona_id = %persona_id, "Analysis received");
                        contributions[index].text = text.to_string();
                        contributions[index].is_ai_generated = true;
                    }
                    None => warn!(
                        persona_id = %persona_id,
                        "Analysis call failed, using template: {}",
                        result.error().unwrap_or_default()
                    ),
                },
                Err(e) => warn!("Task join error: {}", e),
            }
        }
        contributions
    }

    async fn merge(
        &self,
        team: &[Persona],
        contributions: &[PersonaContribution],
    ) -> (AnalysisDraft, bool) {
        let coordinator = team
            .iter()
            .find(|p| p.id == COORDINATOR_ID)
            .cloned()
            .or_else(|| default_team().into_iter().find(|p| p.id == COORDINATOR_ID));
        let template = || template_analysis(contributions.len());
        let Some(coordinator) = coordinator else {
            return (template(), false);
        };

        let system = PromptTemplate::coordinator_system(&coordinator, team);
        let prompt = PromptTemplate::merge_request(contributions);
        let result = self
            .router
            .call(COORDINATOR_ID, &system, &[Message::user(prompt)], None)
            .await;

        let Some(text) = result.text() else {
            warn!(
                "Analysis merge failed, using template: {}",
                result.error().unwrap_or_default()
            );
            return (template(), false);
        };
        match parse_analysis(text) {
            Ok(draft) => (draft.normalized(&template_categories()), true),
            Err(e) => {
                warn!("Analysis merge unusable, using template: {}", e);
                (template(), false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider::{ProviderAdapter, ProviderError};
    use crate::stores::AgentConfigStore;
    use crate::testing::{MemoryStore, ScriptedAdapter, StaticCredentials, StaticRoster};
    use newsroom_domain::analysis::AnalysisCategory;
    use newsroom_domain::persona::defaults::default_config;
    use newsroom_domain::ProviderKind;
    use std::time::Duration;
    use tokio::time::Instant;

    fn merge_json() -> String {
        serde_json::json!({
            "summary": "Station is healthy",
            "categories": {
                "programming": ["a", "b", "c", "d", "e"],
                "marketing": ["only one"]
            }
        })
        .to_string()
    }

    fn use_case(
        adapters: Vec<Arc<dyn ProviderAdapter>>,
        credentials: StaticCredentials,
        team: Vec<Persona>,
    ) -> (CompileAnalysisUseCase, SettingsRepository) {
        let store = Arc::new(MemoryStore::default());
        let roster: Arc<dyn RosterSource> = Arc::new(StaticRoster(team));
        let router = Arc::new(
            CallRouter::new(
                adapters,
                Arc::new(credentials),
                AgentConfigStore::new(store.clone()),
            )
            .with_roster(roster.clone()),
        );
        let settings = SettingsRepository::new(store);
        (
            CompileAnalysisUseCase::new(router, roster, settings.clone()),
            settings,
        )
    }

    #[tokio::test]
    async fn test_compiles_with_partial_failures() {
        // Only Anthropic works: the coordinator merges, members on other
        // providers fall back to Anthropic through the router.
        let anthropic = ScriptedAdapter::new(ProviderKind::Anthropic).otherwise(Ok(merge_json()));
        let gemini = ScriptedAdapter::new(ProviderKind::Gemini)
            .otherwise(Err(ProviderError::SafetyBlocked("blocked".into())));
        let (analysis, settings) = use_case(
            vec![Arc::new(anthropic), Arc::new(gemini)],
            StaticCredentials::only(&[ProviderKind::Anthropic, ProviderKind::Gemini]),
            default_team(),
        );

        let compiled = analysis.execute().await.unwrap();
        assert!(compiled.is_ai_generated);
        assert_eq!(compiled.summary, "Station is healthy");

        let members: Vec<_> = default_team()
            .into_iter()
            .filter(|p| p.id != COORDINATOR_ID)
            .collect();
        let ids: Vec<_> = compiled.contributions.iter().map(|c| c.persona_id.clone()).collect();
        assert_eq!(ids, members.iter().map(|p| p.id.clone()).collect::<Vec<_>>());

        for c in &compiled.contributions {
            let on_gemini = default_config(&c.persona_id)
                .is_some_and(|cfg| cfg.provider == ProviderKind::Gemini);
            assert_eq!(c.is_ai_generated, !on_gemini, "{}", c.persona_id);
        }

        for category in AnalysisCategory::ALL {
            let n = compiled.categories[&category].len();
            assert!((2..=4).contains(&n), "{category:?} has {n}");
        }

        assert_eq!(analysis.latest().await.unwrap(), Some(compiled.clone()));
        assert_eq!(settings.latest_analysis().await.unwrap().unwrap().id, compiled.id);
    }

    #[tokio::test]
    async fn test_no_credentials_yields_template_report() {
        let (analysis, _) = use_case(vec![], StaticCredentials::none(), default_team());
        let compiled = analysis.execute().await.unwrap();
        assert!(!compiled.is_ai_generated);
        assert!(compiled.contributions.iter().all(|c| !c.is_ai_generated));
        assert_eq!(compiled.categories.len(), AnalysisCategory::ALL.len());
    }

    #[tokio::test]
    async fn test_roster_member_without_default_is_analysed() {
        let mut team = default_team();
        team.push(Persona::new("intern", "Kim", "Intern", "#000", ""));
        let anthropic = ScriptedAdapter::new(ProviderKind::Anthropic).otherwise(Ok(merge_json()));
        let (analysis, _) = use_case(
            vec![Arc::new(anthropic)],
            StaticCredentials::only(&[ProviderKind::Anthropic]),
            team,
        );

        let compiled = analysis.execute().await.unwrap();
        let intern = compiled
            .contributions
            .iter()
            .find(|c| c.persona_id == "intern")
            .unwrap();
        assert!(intern.is_ai_generated);
        assert_eq!(intern.persona_name, "Kim");
    }

    #[tokio::test(start_paused = true)]
    async fn test_member_calls_run_concurrently() {
        let delay = Duration::from_secs(20);
        let adapters: Vec<Arc<dyn ProviderAdapter>> = ProviderKind::ALL
            .into_iter()
            .map(|kind| {
                Arc::new(
                    ScriptedAdapter::new(kind)
                        .otherwise(Ok(merge_json()))
                        .with_delay(delay),
                ) as Arc<dyn ProviderAdapter>
            })
            .collect();
        let (analysis, _) = use_case(adapters, StaticCredentials::all(), default_team());

        let started = Instant::now();
        let compiled = analysis.execute().await.unwrap();
        let elapsed = started.elapsed();

        let members = default_team().len() - 1;
        assert!(members >= 3);
        assert!(compiled.contributions.iter().all(|c| c.is_ai_generated));
        // One round of member calls plus the merge, not one round per member
        assert!(elapsed < Duration::from_secs(45), "took {elapsed:?}");
        assert!(elapsed >= delay * 2);
    }

    #[tokio::test]
    async fn test_empty_roster() {
        let (analysis, _) = use_case(vec![], StaticCredentials::none(), vec![]);
        assert!(matches!(
            analysis.execute().await,
            Err(AnalysisError::Domain(DomainError::TeamNotInitialized))
        ));
        assert_eq!(analysis.latest().await.unwrap(), None);
    }
}
