//! Configuration file loading for newsroom
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `NEWSROOM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./newsroom.toml` or `./.newsroom.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/newsroom/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileNotificationsConfig,
    FileProviderConfig, FileProvidersConfig, FileRouterConfig, FileServerConfig,
    FileStorageConfig, FileTelegramConfig, StorageBackend, default_api_key_env,
};
pub use loader::ConfigLoader;
