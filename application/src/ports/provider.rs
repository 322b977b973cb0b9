//! Provider adapter port
//!
//! Defines the uniform contract every AI backend is reached through.

use async_trait::async_trait;
use newsroom_domain::{FailureKind, Message, ProviderKind};
use std::time::Duration;
use thiserror::Error;

/// Errors an adapter can report, already classified
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("billing problem: {0}")]
    Billing(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("blocked by safety filter: {0}")]
    SafetyBlocked(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Auth(_) => FailureKind::Auth,
            ProviderError::Billing(_) => FailureKind::Billing,
            ProviderError::RateLimited(_) => FailureKind::RateLimited,
            ProviderError::Overloaded(_) => FailureKind::Overloaded,
            ProviderError::ModelNotFound(_) => FailureKind::ModelNotFound,
            ProviderError::SafetyBlocked(_) => FailureKind::SafetyBlocked,
            ProviderError::Timeout(_) => FailureKind::Timeout,
            ProviderError::Transport(_) => FailureKind::Transport,
            ProviderError::EmptyResponse => FailureKind::EmptyResponse,
            ProviderError::Provider { .. } => FailureKind::Provider,
            ProviderError::InvalidRequest(_) => FailureKind::Config,
        }
    }
}

/// Canonical request handed to an adapter
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Provider-native agent id, only set for custom-agent models
    pub agent_handle: Option<String>,
}

/// One AI backend
///
/// Implementations translate the canonical request into the provider's
/// wire format and the response back into plain text. They live in the
/// infrastructure layer.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn send(&self, request: &ProviderRequest) -> Result<String, ProviderError>;
}
