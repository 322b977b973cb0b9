//! Singleton records: autopilot state, notification settings and the
//! latest compiled analysis

use super::{keys, load, save};
use crate::ports::kv_store::{KeyValueStore, StoreError};
use newsroom_domain::{AutopilotConfig, CompiledAnalysis, NotificationSettings};
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Default (disabled) when nothing is stored
    pub async fn autopilot(&self) -> Result<AutopilotConfig, StoreError> {
        Ok(load(self.store.as_ref(), keys::AUTOPILOT)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_autopilot(&self, config: &AutopilotConfig) -> Result<(), StoreError> {
        save(self.store.as_ref(), keys::AUTOPILOT, config).await
    }

    pub async fn notifications(&self) -> Result<NotificationSettings, StoreError> {
        Ok(load(self.store.as_ref(), keys::NOTIFICATIONS)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_notifications(
        &self,
        settings: &NotificationSettings,
    ) -> Result<(), StoreError> {
        save(self.store.as_ref(), keys::NOTIFICATIONS, settings).await
    }

    pub async fn latest_analysis(&self) -> Result<Option<CompiledAnalysis>, StoreError> {
        load(self.store.as_ref(), keys::LATEST_ANALYSIS).await
    }

    pub async fn save_analysis(&self, analysis: &CompiledAnalysis) -> Result<(), StoreError> {
        save(self.store.as_ref(), keys::LATEST_ANALYSIS, analysis).await
    }
}
