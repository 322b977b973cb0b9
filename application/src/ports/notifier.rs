//! Notification sink port

use async_trait::async_trait;
use newsroom_domain::MessageFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification sink is not configured: {0}")]
    NotConfigured(String),

    #[error("Notification rejected: {0}")]
    Rejected(String),

    #[error("Notification transport error: {0}")]
    Transport(String),
}

/// Outbound message channel (e.g. a chat bot)
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send_message(
        &self,
        destination: &str,
        text: &str,
        format: MessageFormat,
    ) -> Result<(), NotifyError>;
}
