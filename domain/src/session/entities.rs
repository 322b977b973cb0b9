//! Editorial session entities

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of editorial session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Brainstorm,
    News,
    Rubric,
    Schedule,
    Review,
}

impl SessionType {
    pub const ALL: [SessionType; 5] = [
        SessionType::Brainstorm,
        SessionType::News,
        SessionType::Rubric,
        SessionType::Schedule,
        SessionType::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Brainstorm => "brainstorm",
            SessionType::News => "news",
            SessionType::Rubric => "rubric",
            SessionType::Schedule => "schedule",
            SessionType::Review => "review",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SessionType::Brainstorm => "Brainstorm",
            SessionType::News => "News planning",
            SessionType::Rubric => "Rubric workshop",
            SessionType::Schedule => "Schedule review",
            SessionType::Review => "On-air review",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownSessionType(s.to_string()))
    }
}

/// Session lifecycle:
/// `in-progress → synthesizing → completed → {approved | rejected}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    InProgress,
    Synthesizing,
    Completed,
    Approved,
    Rejected,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Synthesizing => "synthesizing",
            SessionStatus::Completed => "completed",
            SessionStatus::Approved => "approved",
            SessionStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Approved | SessionStatus::Rejected)
    }

    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::InProgress, SessionStatus::Synthesizing)
                | (SessionStatus::Synthesizing, SessionStatus::Completed)
                | (SessionStatus::Completed, SessionStatus::Approved)
                | (SessionStatus::Completed, SessionStatus::Rejected)
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One run of the editorial protocol (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub topic: String,
    pub status: SessionStatus,
    pub participants: Vec<String>,
    pub messages_count: usize,
    pub deliverable_ids: Vec<String>,
    pub coordinator_summary: Option<String>,
    pub coordinator_report: Option<String>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        session_type: SessionType,
        topic: impl Into<String>,
        participants: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            session_type,
            topic: topic.into(),
            status: SessionStatus::InProgress,
            participants,
            messages_count: 0,
            deliverable_ids: Vec::new(),
            coordinator_summary: None,
            coordinator_report: None,
            feedback: None,
            created_at,
            completed_at: None,
        }
    }

    /// Move to `next`, rejecting anything the lifecycle does not allow
    pub fn transition(&mut self, next: SessionStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// `synthesizing → completed`, recording the synthesis outputs
    pub fn complete(
        &mut self,
        summary: String,
        report: String,
        deliverable_ids: Vec<String>,
        messages_count: usize,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.transition(SessionStatus::Completed)?;
        self.coordinator_summary = Some(summary);
        self.coordinator_report = Some(report);
        self.deliverable_ids = deliverable_ids;
        self.messages_count = messages_count;
        self.completed_at = Some(at);
        Ok(())
    }

    pub fn approve(&mut self, feedback: Option<String>) -> Result<(), DomainError> {
        self.transition(SessionStatus::Approved)?;
        self.feedback = feedback;
        Ok(())
    }

    pub fn reject(&mut self, feedback: Option<String>) -> Result<(), DomainError> {
        self.transition(SessionStatus::Rejected)?;
        self.feedback = feedback;
        Ok(())
    }
}

/// One line of a session transcript. Append-only, ordered by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMessage {
    pub session_id: String,
    pub index: usize,
    pub persona_id: String,
    pub text: String,
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
    pub timestamp: DateTime<Utc>,
}
