//! Call domain: the canonical request and result shapes of one AI call.
//!
//! [`CallResult`] is a sum type. A call either produced usable text or it
//! failed with a classified reason; callers never see a half-filled result.

use crate::providers::ProviderKind;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in a conversation. Exists only for the duration of one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-call override applied on top of the stored persona config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOverride {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Classified failure reason of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Disabled,
    KeyMissing,
    Auth,
    Billing,
    RateLimited,
    Overloaded,
    ModelNotFound,
    SafetyBlocked,
    Timeout,
    Transport,
    EmptyResponse,
    Provider,
    Config,
    /// Every fallback path was tried and failed
    Exhausted,
}

impl FailureKind {
    /// Failures that will not go away by retrying the same credential
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            FailureKind::Auth | FailureKind::Billing | FailureKind::KeyMissing
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl CallFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CallFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Text(String),
    Failed(CallFailure),
}

/// Result of one routed AI call (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    /// Provider that produced the outcome; `None` when no provider was reached
    pub provider: Option<ProviderKind>,
    pub model: String,
    pub duration_ms: u64,
    pub outcome: CallOutcome,
}

impl CallResult {
    pub fn success(
        provider: ProviderKind,
        model: impl Into<String>,
        duration_ms: u64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            provider: Some(provider),
            model: model.into(),
            duration_ms,
            outcome: CallOutcome::Text(text.into()),
        }
    }

    pub fn failure(
        provider: Option<ProviderKind>,
        model: impl Into<String>,
        duration_ms: u64,
        failure: CallFailure,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            duration_ms,
            outcome: CallOutcome::Failed(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CallOutcome::Text(_))
    }

    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            CallOutcome::Text(text) => Some(text),
            CallOutcome::Failed(_) => None,
        }
    }

    pub fn failure_ref(&self) -> Option<&CallFailure> {
        match &self.outcome {
            CallOutcome::Failed(failure) => Some(failure),
            CallOutcome::Text(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.failure_ref().map(|f| f.message.as_str())
    }

    /// Flat wire view: `text` is empty whenever `error` is set
    pub fn to_view(&self) -> CallResultView {
        CallResultView {
            text: self.text().unwrap_or_default().to_string(),
            provider: self.provider,
            model: self.model.clone(),
            duration_ms: self.duration_ms,
            error: self.error().map(str::to_string),
            error_kind: self.failure_ref().map(|f| f.kind),
        }
    }
}

/// Serializable flat projection of [`CallResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResultView {
    pub text: String,
    pub provider: Option<ProviderKind>,
    pub model: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
}
