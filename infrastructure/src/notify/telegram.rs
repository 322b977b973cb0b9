//! Telegram Bot API notification sink

use async_trait::async_trait;
use newsroom_application::{NotificationSink, NotifyError};
use newsroom_domain::MessageFormat;
use newsroom_domain::core::string::truncate_chars;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Telegram rejects messages longer than this
const MAX_MESSAGE_CHARS: usize = 4000;

/// Where the bot token comes from
#[derive(Debug, Clone)]
pub enum BotToken {
    Inline(String),
    Env(String),
}

impl BotToken {
    fn resolve(&self) -> Option<String> {
        let token = match self {
            BotToken::Inline(token) => Some(token.clone()),
            BotToken::Env(var) => std::env::var(var).ok(),
        };
        token.filter(|t| !t.trim().is_empty())
    }
}

pub struct TelegramSink {
    client: Client,
    base_url: String,
    token: BotToken,
}

impl TelegramSink {
    pub fn new(client: Client, base_url: impl Into<String>, token: BotToken) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct Reply {
    ok: bool,
    description: Option<String>,
}

fn build_payload<'a>(chat_id: &'a str, text: &str, format: MessageFormat) -> SendMessage<'a> {
    SendMessage {
        chat_id,
        text: truncate_chars(text, MAX_MESSAGE_CHARS),
        parse_mode: match format {
            MessageFormat::Html => Some("HTML"),
            MessageFormat::Plain => None,
        },
    }
}

fn check_reply(status: u16, body: &str) -> Result<(), NotifyError> {
    match serde_json::from_str::<Reply>(body) {
        Ok(reply) if reply.ok => Ok(()),
        Ok(reply) => Err(NotifyError::Rejected(
            reply
                .description
                .unwrap_or_else(|| format!("HTTP {status}")),
        )),
        Err(_) => Err(NotifyError::Rejected(format!(
            "HTTP {status}: {}",
            truncate_chars(body, 200)
        ))),
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn send_message(
        &self,
        destination: &str,
        text: &str,
        format: MessageFormat,
    ) -> Result<(), NotifyError> {
        let token = self
            .token
            .resolve()
            .ok_or_else(|| NotifyError::NotConfigured("bot token missing".to_string()))?;

        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.base_url, token))
            .json(&build_payload(destination, text, format))
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;
        check_reply(status, &body)
    }
}
