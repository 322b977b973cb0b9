//! Outbound notification sinks

mod telegram;

pub use telegram::{BotToken, TelegramSink};

use crate::config::FileTelegramConfig;
use reqwest::Client;

impl From<&FileTelegramConfig> for BotToken {
    fn from(config: &FileTelegramConfig) -> Self {
        match config.bot_token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => BotToken::Inline(token.to_string()),
            None => BotToken::Env(config.bot_token_env.clone()),
        }
    }
}

pub fn telegram_sink(client: Client, config: &FileTelegramConfig) -> TelegramSink {
    TelegramSink::new(client, config.base_url.clone(), BotToken::from(config))
}
