//! Typed repositories over the [`KeyValueStore`] port.
//!
//! Each repository owns one slice of the key space (see [`keys`]) and
//! (de)serializes its records as camelCase JSON.

pub mod agent_configs;
pub mod editorial;
pub mod keys;
pub mod settings;

pub use agent_configs::AgentConfigStore;
pub use editorial::EditorialRepository;
pub use settings::SettingsRepository;

use crate::ports::kv_store::{KeyValueStore, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

pub(crate) async fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub(crate) async fn save<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    record: &T,
) -> Result<(), StoreError> {
    store.set(key, serde_json::to_value(record)?).await
}

/// Every record under `prefix`; entries that no longer decode are skipped
pub(crate) async fn load_all<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    prefix: &str,
) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();
    for (key, value) in store.scan_prefix(prefix).await? {
        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!(key = %key, "Skipping undecodable record: {}", e),
        }
    }
    Ok(records)
}
