//! Roster port: the broadcast team listing

use super::kv_store::StoreError;
use async_trait::async_trait;
use newsroom_domain::Persona;

#[async_trait]
pub trait RosterSource: Send + Sync {
    /// The team in display order; empty when not initialized
    async fn team(&self) -> Result<Vec<Persona>, StoreError>;
}
