//! Key-value store backends

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

use crate::config::{FileStorageConfig, StorageBackend};
use newsroom_application::{KeyValueStore, StoreError};
use std::sync::Arc;

/// Open the backend selected by `[storage]`
pub async fn open_store(config: &FileStorageConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryKeyValueStore::new())),
        StorageBackend::File => Ok(Arc::new(
            FileKeyValueStore::open(config.resolved_dir()).await?,
        )),
    }
}
