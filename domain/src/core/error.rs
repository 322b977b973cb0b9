//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are the only failures that reach a caller synchronously: invalid
/// input and illegal state transitions. Provider failures never surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Team not initialized: the broadcast roster is empty")]
    TeamNotInitialized,

    #[error("Team has no coordinator persona '{0}'")]
    CoordinatorMissing(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Model '{model}' is not available for provider {provider}")]
    InvalidModel { provider: String, model: String },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown session type: {0}")]
    UnknownSessionType(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Deliverable not found: {0}")]
    DeliverableNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Illegal session transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Session {0} is not approved")]
    SessionNotApproved(String),

    #[error("Session {0} has no approved deliverables")]
    NoApprovedDeliverables(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    /// Whether this error means a referenced record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::SessionNotFound(_)
                | DomainError::DeliverableNotFound(_)
                | DomainError::TaskNotFound(_)
                | DomainError::UnknownPersona(_)
        )
    }
}
