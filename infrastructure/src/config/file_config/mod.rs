//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod providers;
mod router;

pub use providers::{FileProviderConfig, FileProvidersConfig, default_api_key_env};
pub use router::FileRouterConfig;

use newsroom_domain::Persona;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("unknown provider in router.preference: {0}")]
    UnknownProvider(String),

    #[error("router.preference cannot be empty")]
    EmptyPreference,

    #[error("team member id cannot be empty")]
    EmptyTeamMemberId,

    #[error("server.bind is not a socket address: {0}")]
    InvalidBind(String),
}

/// Where records are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

/// Raw storage configuration (`[storage]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the file backend (default: `<data dir>/newsroom`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl FileStorageConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("newsroom"))
                .unwrap_or_else(|| PathBuf::from(".newsroom"))
        })
    }
}

/// Raw Telegram configuration (`[notifications.telegram]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTelegramConfig {
    pub bot_token_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    pub base_url: String,
}

impl Default for FileTelegramConfig {
    fn default() -> Self {
        Self {
            bot_token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            bot_token: None,
            base_url: "https://api.telegram.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotificationsConfig {
    pub telegram: FileTelegramConfig,
}

/// Raw HTTP server configuration (`[server]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
        }
    }
}

/// Raw logging configuration (`[logging]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the daily rolling log file; stderr only when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Timeouts and fallback order
    pub router: FileRouterConfig,
    /// Record storage
    pub storage: FileStorageConfig,
    /// Outbound notification channels
    pub notifications: FileNotificationsConfig,
    /// HTTP surface
    pub server: FileServerConfig,
    /// File logging
    pub logging: FileLoggingConfig,
    /// Roster seed, written to the store when the stored roster is empty
    pub team: Vec<Persona>,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.router.validate()?;

        if self.team.iter().any(|p| p.id.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyTeamMemberId);
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigValidationError::InvalidBind(self.server.bind.clone()));
        }

        Ok(())
    }

    /// Render the effective configuration back to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsroom_domain::ProviderKind;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[providers.anthropic]
api_key_env = "CLAUDE_KEY"

[router]
base_timeout_secs = 20
preference = ["gemini", "anthropic"]

[storage]
backend = "memory"

[notifications.telegram]
bot_token_env = "NEWSROOM_BOT"

[server]
bind = "0.0.0.0:9000"

[logging]
dir = "/var/log/newsroom"

[[team]]
id = "producer"
name = "Vera"
role = "Producer"
emoji = "🎬"

[[team]]
id = "host"
name = "Leo"
role = "Host"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.providers.api_key_env(ProviderKind::Anthropic),
            "CLAUDE_KEY"
        );
        assert_eq!(config.router.base_timeout_secs, 20);
        assert_eq!(config.router.deep_timeout_secs, 60);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.notifications.telegram.bot_token_env, "NEWSROOM_BOT");
        assert_eq!(
            config.notifications.telegram.base_url,
            "https://api.telegram.org"
        );
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(
            config.logging.dir,
            Some(PathBuf::from("/var/log/newsroom"))
        );
        assert_eq!(config.team.len(), 2);
        assert_eq!(config.team[1].color, "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.team.is_empty());
        assert!(config.logging.dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_bind() {
        let config = FileConfig {
            server: FileServerConfig {
                bind: "localhost".into(),
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidBind(_))
        ));
    }

    #[test]
    fn test_validate_empty_team_id() {
        let config = FileConfig {
            team: vec![Persona::new(" ", "Nobody", "Ghost", "", "")],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyTeamMemberId)
        ));
    }

    #[test]
    fn test_to_toml_reparses() {
        let mut config = FileConfig::default();
        config.router.preference = vec!["kimi".into()];
        let rendered = config.to_toml().unwrap();
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
