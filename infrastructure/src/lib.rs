//! Infrastructure layer for newsroom
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod credentials;
pub mod notify;
pub mod providers;
pub mod roster;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, StorageBackend};
pub use credentials::EnvCredentials;
pub use notify::{BotToken, TelegramSink, telegram_sink};
pub use providers::{build_adapters, http_client};
pub use roster::StoreRoster;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore, open_store};
