//! Dependency injection: builds every use case over one store

use anyhow::{Context, Result};
use newsroom_application::{
    AgentConfigStore, AutopilotUseCase, CallRouter, CompileAnalysisUseCase, CredentialSource,
    EditorialRepository, KeyValueStore, ManageConfigUseCase, ModerationUseCase,
    NotificationSink, Notifier, PlanTasksUseCase, ProviderAdapter, RosterSource, RouterParams,
    SessionOrchestrator, SettingsRepository,
};
use newsroom_domain::persona::defaults::default_team;
use newsroom_infrastructure::{
    EnvCredentials, FileConfig, StoreRoster, build_adapters, http_client, open_store,
    telegram_sink,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state accessible by all API handlers
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CallRouter>,
    pub sessions: Arc<SessionOrchestrator>,
    pub moderation: Arc<ModerationUseCase>,
    pub planner: Arc<PlanTasksUseCase>,
    pub autopilot: Arc<AutopilotUseCase>,
    pub analysis: Arc<CompileAnalysisUseCase>,
    pub configs: Arc<ManageConfigUseCase>,
    pub notifier: Notifier,
    pub roster: Arc<dyn RosterSource>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        adapters: Vec<Arc<dyn ProviderAdapter>>,
        credentials: Arc<dyn CredentialSource>,
        params: RouterParams,
        roster: Arc<dyn RosterSource>,
        sink: Option<Arc<dyn NotificationSink>>,
    ) -> Self {
        let editorial = EditorialRepository::new(store.clone());
        let settings = SettingsRepository::new(store.clone());
        let agent_configs = AgentConfigStore::new(store);
        let notifier = Notifier::new(sink, settings.clone());

        let router = Arc::new(
            CallRouter::new(adapters, credentials, agent_configs.clone())
                .with_params(params)
                .with_roster(roster.clone()),
        );
        let sessions = Arc::new(SessionOrchestrator::new(
            router.clone(),
            editorial.clone(),
            roster.clone(),
            notifier.clone(),
        ));

        Self {
            moderation: Arc::new(ModerationUseCase::new(editorial.clone(), notifier.clone())),
            planner: Arc::new(PlanTasksUseCase::new(
                router.clone(),
                editorial,
                roster.clone(),
            )),
            autopilot: Arc::new(AutopilotUseCase::new(settings.clone(), sessions.clone())),
            analysis: Arc::new(CompileAnalysisUseCase::new(
                router.clone(),
                roster.clone(),
                settings,
            )),
            configs: Arc::new(ManageConfigUseCase::new(
                agent_configs,
                roster.clone(),
                router.clone(),
            )),
            router,
            sessions,
            notifier,
            roster,
        }
    }

    /// Wire the real adapters described by `config`
    pub async fn from_config(config: &FileConfig, seed_default_team: bool) -> Result<Self> {
        let params = config
            .router
            .to_router_params()
            .context("invalid [router] configuration")?;
        let store = open_store(&config.storage)
            .await
            .context("failed to open the record store")?;
        let client = http_client().context("failed to build the HTTP client")?;

        let roster = Arc::new(StoreRoster::new(store.clone()));
        if !config.team.is_empty() {
            roster.seed_if_empty(&config.team).await?;
        } else if seed_default_team {
            roster.seed_if_empty(&default_team()).await?;
        }
        if roster.team().await?.is_empty() {
            warn!("Team roster is empty; sessions will fail until it is seeded");
        }

        let credentials = Arc::new(EnvCredentials::from_config(&config.providers));
        let sink: Arc<dyn NotificationSink> = Arc::new(telegram_sink(
            client.clone(),
            &config.notifications.telegram,
        ));

        let state = Self::new(
            store,
            build_adapters(&client, &config.providers),
            credentials,
            params,
            roster,
            Some(sink),
        );

        for kind in newsroom_domain::ProviderKind::ALL {
            info!(
                provider = kind.as_str(),
                credential = state.router.has_credential(kind),
                "Provider registered"
            );
        }
        Ok(state)
    }
}
