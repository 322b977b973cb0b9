//! Roster source backed by the key-value store
//!
//! Team members live under `team:<position>:<id>`; the zero-padded position
//! keeps prefix scans in display order.

use async_trait::async_trait;
use newsroom_application::stores::keys;
use newsroom_application::{KeyValueStore, RosterSource, StoreError};
use newsroom_domain::Persona;
use std::sync::Arc;
use tracing::{info, warn};

pub struct StoreRoster {
    store: Arc<dyn KeyValueStore>,
}

impl StoreRoster {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Write `team` when no member is stored yet. Returns whether it did.
    pub async fn seed_if_empty(&self, team: &[Persona]) -> Result<bool, StoreError> {
        if team.is_empty() || !self.team().await?.is_empty() {
            return Ok(false);
        }
        for (position, persona) in team.iter().enumerate() {
            self.store
                .set(
                    &keys::roster_member(position, &persona.id),
                    serde_json::to_value(persona)?,
                )
                .await?;
        }
        info!(members = team.len(), "Seeded team roster");
        Ok(true)
    }
}

#[async_trait]
impl RosterSource for StoreRoster {
    async fn team(&self) -> Result<Vec<Persona>, StoreError> {
        let entries = self.store.scan_prefix(keys::ROSTER).await?;
        let mut team = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match serde_json::from_value::<Persona>(value) {
                Ok(persona) => team.push(persona),
                Err(e) => warn!(key = %key, error = %e, "Skipping unreadable roster entry"),
            }
        }
        Ok(team)
    }
}
