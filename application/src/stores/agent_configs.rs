//! Agent Config Store
//!
//! Stored configs are overrides of the compiled defaults. A persona with
//! nothing stored resolves to its default; the stored record's `agentId`
//! is always forced back to its lookup key.

use super::{keys, load, save};
use crate::ports::kv_store::{KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use newsroom_domain::AgentConfig;
use newsroom_domain::persona::defaults::default_config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AgentConfigStore {
    store: Arc<dyn KeyValueStore>,
}

impl AgentConfigStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored record only, `agentId` forced to `agent_id`
    pub async fn stored(&self, agent_id: &str) -> Result<Option<AgentConfig>, StoreError> {
        let config: Option<AgentConfig> =
            load(self.store.as_ref(), &keys::agent_config(agent_id)).await?;
        Ok(config.map(|mut c| {
            c.agent_id = agent_id.to_string();
            c.clamped()
        }))
    }

    /// Stored record, else the compiled default, else `None`
    pub async fn resolve(&self, agent_id: &str) -> Result<Option<AgentConfig>, StoreError> {
        match self.stored(agent_id).await? {
            Some(config) => Ok(Some(config)),
            None => Ok(default_config(agent_id)),
        }
    }

    pub async fn save(&self, config: &AgentConfig) -> Result<(), StoreError> {
        save(
            self.store.as_ref(),
            &keys::agent_config(&config.agent_id),
            config,
        )
        .await
    }

    /// Delete the stored record so the default reappears
    pub async fn reset(&self, agent_id: &str) -> Result<bool, StoreError> {
        self.store.delete(&keys::agent_config(agent_id)).await
    }

    /// Telemetry side effect of one routed call. Read-modify-write against
    /// the persona's own config, never the per-call override; `baseline`
    /// is used when nothing is stored yet.
    pub async fn record_call(
        &self,
        baseline: &AgentConfig,
        at: DateTime<Utc>,
        duration_ms: u64,
        error: Option<String>,
    ) -> Result<(), StoreError> {
        let mut config = match self.stored(&baseline.agent_id).await? {
            Some(config) => config,
            None => baseline.clone(),
        };
        config.record_call(at, duration_ms, error);
        self.save(&config).await
    }
}
