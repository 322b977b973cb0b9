//! Autopilot Scheduler use case
//!
//! `tick` is polled by an external cron. Each due tick runs one session of
//! the current rotation type. Before running, a tick writes a lease to the
//! config and reads it back; a tick that finds another token backs off as
//! busy. The store has no compare-and-swap, so this narrows the window for
//! overlapping ticks rather than closing it: two ticks that each write and
//! read back before the other writes will both run.

use crate::ports::kv_store::StoreError;
use crate::stores::SettingsRepository;
use crate::use_cases::run_session::{RunSessionInput, SessionError, SessionOrchestrator};
use chrono::{DateTime, Utc};
use newsroom_domain::autopilot::SkipReason;
use newsroom_domain::{AutopilotConfig, AutopilotPatch, DomainError, TickDecision, TickOutcome};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AutopilotError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Autopilot session failed: {0}")]
    Session(#[from] SessionError),
}

pub struct AutopilotUseCase {
    settings: SettingsRepository,
    orchestrator: Arc<SessionOrchestrator>,
}

impl AutopilotUseCase {
    pub fn new(settings: SettingsRepository, orchestrator: Arc<SessionOrchestrator>) -> Self {
        Self {
            settings,
            orchestrator,
        }
    }

    pub async fn config(&self) -> Result<AutopilotConfig, AutopilotError> {
        Ok(self.settings.autopilot().await?)
    }

    pub async fn update(&self, patch: &AutopilotPatch) -> Result<AutopilotConfig, AutopilotError> {
        let mut config = self.settings.autopilot().await?;
        config.apply_patch(patch, Utc::now())?;
        self.settings.save_autopilot(&config).await?;
        info!(
            enabled = config.enabled,
            interval_minutes = config.interval_minutes,
            next_run_at = ?config.next_run_at,
            "Autopilot updated"
        );
        Ok(config)
    }

    pub async fn tick(&self) -> Result<TickOutcome, AutopilotError> {
        self.tick_at(Utc::now()).await
    }

    /// One scheduler poll at `now`. Skips write nothing.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> Result<TickOutcome, AutopilotError> {
        let mut config = self.settings.autopilot().await?;
        let session_type = match config.decide(now) {
            TickDecision::Skip { reason, remaining } => {
                debug!(?reason, "Autopilot tick skipped");
                return Ok(TickOutcome::skipped(reason, remaining, config.next_run_at));
            }
            TickDecision::Run(session_type) => session_type,
        };

        // Claim the run, then re-read to see whether another tick won
        let token = Uuid::new_v4().to_string();
        config.acquire_lease(&token, now);
        self.settings.save_autopilot(&config).await?;
        let claimed = self.settings.autopilot().await?;
        if !claimed.holds_lease(&token) {
            debug!("Autopilot tick lost the lease");
            return Ok(TickOutcome::skipped(
                SkipReason::Busy,
                None,
                claimed.next_run_at,
            ));
        }

        info!(session_type = %session_type, run = claimed.sessions_run + 1, "Autopilot running session");
        let run = self
            .orchestrator
            .execute(RunSessionInput::new(session_type))
            .await;

        // Re-read: the config may have been patched while the session ran
        let mut config = self.settings.autopilot().await?;
        match run {
            Ok(run) => {
                config.advance(now);
                self.settings.save_autopilot(&config).await?;
                info!(
                    session_id = %run.session.id,
                    next_run_at = ?config.next_run_at,
                    "Autopilot session finished"
                );
                Ok(TickOutcome::triggered(
                    run.session.id,
                    session_type,
                    config.next_run_at,
                ))
            }
            Err(e) => {
                if config.holds_lease(&token) {
                    config.lease = None;
                    self.settings.save_autopilot(&config).await?;
                }
                warn!(session_type = %session_type, "Autopilot session failed: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider::ProviderAdapter;
    use crate::stores::{AgentConfigStore, EditorialRepository};
    use crate::testing::{
        MemoryStore, ScriptedAdapter, StaticCredentials, StaticRoster, synthesis_json,
    };
    use crate::ports::kv_store::KeyValueStore;
    use crate::stores::keys;
    use crate::use_cases::call_ai::CallRouter;
    use crate::use_cases::notify::Notifier;
    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use newsroom_domain::autopilot::TickLease;
    use newsroom_domain::{Persona, ProviderKind, SessionType};

    struct Harness {
        autopilot: AutopilotUseCase,
        settings: SettingsRepository,
        repo: EditorialRepository,
        store: Arc<MemoryStore>,
    }

    fn harness_with_team(team: Vec<Persona>) -> Harness {
        let store = Arc::new(MemoryStore::default());
        let router = Arc::new(CallRouter::new(
            vec![Arc::new(
                ScriptedAdapter::new(ProviderKind::Anthropic).otherwise(Ok(synthesis_json(2))),
            ) as Arc<dyn ProviderAdapter>],
            Arc::new(StaticCredentials::all()),
            AgentConfigStore::new(store.clone()),
        ));
        let repo = EditorialRepository::new(store.clone());
        let settings = SettingsRepository::new(store.clone());
        let orchestrator = Arc::new(SessionOrchestrator::new(
            router,
            repo.clone(),
            Arc::new(StaticRoster(team)),
            Notifier::new(None, settings.clone()),
        ));
        Harness {
            autopilot: AutopilotUseCase::new(settings.clone(), orchestrator),
            settings,
            repo,
            store,
        }
    }

    fn harness() -> Harness {
        harness_with_team(StaticRoster::standard().0)
    }

    async fn enable(h: &Harness, rotation: Vec<SessionType>) -> AutopilotConfig {
        h.autopilot
            .update(&AutopilotPatch {
                enabled: Some(true),
                interval_minutes: Some(60),
                type_rotation: Some(rotation),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_disabled_tick_does_nothing() {
        let h = harness();
        let outcome = h.autopilot.tick().await.unwrap();
        assert!(!outcome.triggered);
        assert_eq!(outcome.reason, Some(SkipReason::Disabled));
        assert_eq!(h.store.len(), 0);
    }

    #[tokio::test]
    async fn test_enabling_schedules_first_run_now() {
        let h = harness();
        let before = Utc::now();
        let config = enable(&h, vec![SessionType::News]).await;
        assert!(config.enabled);
        assert!(config.next_run_at.unwrap() >= before);
    }

    #[tokio::test]
    async fn test_due_tick_runs_and_advances() {
        let h = harness();
        enable(&h, vec![SessionType::News, SessionType::Review]).await;
        let now = Utc::now() + Duration::seconds(1);

        let outcome = h.autopilot.tick_at(now).await.unwrap();
        assert!(outcome.triggered);
        assert_eq!(outcome.session_type, Some(SessionType::News));
        let session_id = outcome.session_id.unwrap();
        assert!(h.repo.session(&session_id).await.unwrap().is_some());

        let config = h.settings.autopilot().await.unwrap();
        assert_eq!(config.sessions_run, 1);
        assert_eq!(config.current_type_index, 1);
        assert_eq!(config.last_run_at, Some(now));
        assert_eq!(config.next_run_at, Some(now + Duration::minutes(60)));
        assert!(config.lease.is_none());
    }

    #[tokio::test]
    async fn test_tick_before_next_run_writes_nothing() {
        let h = harness();
        enable(&h, vec![SessionType::News]).await;
        let now = Utc::now() + Duration::seconds(1);
        h.autopilot.tick_at(now).await.unwrap();
        let records = h.store.len();

        let outcome = h
            .autopilot
            .tick_at(now + Duration::minutes(10))
            .await
            .unwrap();
        assert!(!outcome.triggered);
        assert_eq!(outcome.reason, Some(SkipReason::NotYet));
        assert_eq!(outcome.remaining_seconds, Some(50 * 60));
        assert_eq!(h.store.len(), records);
    }

    #[tokio::test]
    async fn test_rotation_wraps_around() {
        let h = harness();
        enable(&h, vec![SessionType::News, SessionType::Review]).await;
        let mut now = Utc::now() + Duration::seconds(1);
        let mut types = Vec::new();
        for _ in 0..3 {
            let outcome = h.autopilot.tick_at(now).await.unwrap();
            types.push(outcome.session_type.unwrap());
            now += Duration::minutes(61);
        }
        assert_eq!(
            types,
            vec![SessionType::News, SessionType::Review, SessionType::News]
        );
        assert_eq!(h.settings.autopilot().await.unwrap().sessions_run, 3);
    }

    #[tokio::test]
    async fn test_live_lease_reports_busy() {
        let h = harness();
        let mut config = enable(&h, vec![SessionType::News]).await;
        let now = Utc::now() + Duration::seconds(1);
        config.lease = Some(TickLease {
            token: "other".into(),
            until: now + Duration::minutes(5),
        });
        h.settings.save_autopilot(&config).await.unwrap();

        let outcome = h.autopilot.tick_at(now).await.unwrap();
        assert_eq!(outcome.reason, Some(SkipReason::Busy));

        // An expired lease is taken over
        let outcome = h
            .autopilot
            .tick_at(now + Duration::minutes(6))
            .await
            .unwrap();
        assert!(outcome.triggered);
    }

    /// Store where a rival tick claims the lease right after ours is written
    struct ContendedStore {
        inner: MemoryStore,
        armed: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for ContendedStore {
        async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
            let mut value = value;
            if key == keys::AUTOPILOT && self.armed.load(Ordering::SeqCst) {
                let mut config: AutopilotConfig = serde_json::from_value(value.clone())?;
                if let Some(lease) = config.lease.as_mut() {
                    self.armed.store(false, Ordering::SeqCst);
                    lease.token = "rival".into();
                    value = serde_json::to_value(&config)?;
                }
            }
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> Result<bool, StoreError> {
            self.inner.delete(key).await
        }

        async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError> {
            self.inner.scan_prefix(prefix).await
        }
    }

    #[tokio::test]
    async fn test_tick_backs_off_when_lease_is_overwritten() {
        let store = Arc::new(ContendedStore {
            inner: MemoryStore::default(),
            armed: AtomicBool::new(false),
        });
        let router = Arc::new(CallRouter::new(
            vec![Arc::new(
                ScriptedAdapter::new(ProviderKind::Anthropic).otherwise(Ok(synthesis_json(2))),
            ) as Arc<dyn ProviderAdapter>],
            Arc::new(StaticCredentials::all()),
            AgentConfigStore::new(store.clone()),
        ));
        let repo = EditorialRepository::new(store.clone());
        let settings = SettingsRepository::new(store.clone());
        let autopilot = AutopilotUseCase::new(
            settings.clone(),
            Arc::new(SessionOrchestrator::new(
                router,
                repo.clone(),
                Arc::new(StaticRoster::standard()),
                Notifier::new(None, settings.clone()),
            )),
        );
        autopilot
            .update(&AutopilotPatch {
                enabled: Some(true),
                interval_minutes: Some(60),
                type_rotation: Some(vec![SessionType::News]),
            })
            .await
            .unwrap();
        store.armed.store(true, Ordering::SeqCst);

        let outcome = autopilot
            .tick_at(Utc::now() + Duration::seconds(1))
            .await
            .unwrap();
        assert!(!outcome.triggered);
        assert_eq!(outcome.reason, Some(SkipReason::Busy));
        assert!(repo.list_sessions(None).await.unwrap().is_empty());

        let config = settings.autopilot().await.unwrap();
        assert_eq!(config.sessions_run, 0);
        assert!(config.holds_lease("rival"));
    }

    #[tokio::test]
    async fn test_failed_run_releases_lease() {
        let h = harness_with_team(vec![]);
        enable(&h, vec![SessionType::News]).await;
        let err = h
            .autopilot
            .tick_at(Utc::now() + Duration::seconds(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AutopilotError::Session(SessionError::Domain(DomainError::TeamNotInitialized))
        ));
        let config = h.settings.autopilot().await.unwrap();
        assert!(config.lease.is_none());
        assert_eq!(config.sessions_run, 0);
    }

    #[tokio::test]
    async fn test_empty_rotation_is_rejected() {
        let h = harness();
        let err = h
            .autopilot
            .update(&AutopilotPatch {
                type_rotation: Some(vec![]),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AutopilotError::Domain(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_interval_is_clamped() {
        let h = harness();
        let config = h
            .autopilot
            .update(&AutopilotPatch {
                interval_minutes: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(config.interval_minutes, 15);
    }
}
