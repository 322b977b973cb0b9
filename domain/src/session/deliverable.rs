//! Deliverables: independently approvable outputs of a session's synthesis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverableStatus {
    Pending,
    Approved,
    Rejected,
    Revised,
}

impl DeliverableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliverableStatus::Pending => "pending",
            DeliverableStatus::Approved => "approved",
            DeliverableStatus::Rejected => "rejected",
            DeliverableStatus::Revised => "revised",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Lenient parse of model output; anything unrecognized is `Medium`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "minor" => Priority::Low,
            "high" | "urgent" | "critical" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

/// A discrete output of synthesis (Entity). Never exists without its session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub id: String,
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub content: String,
    pub status: DeliverableStatus,
    pub priority: Priority,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deliverable {
    pub fn pending(
        id: impl Into<String>,
        session_id: impl Into<String>,
        draft: DeliverableDraft,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            session_id: session_id.into(),
            kind: draft.kind,
            title: draft.title,
            content: draft.content,
            status: DeliverableStatus::Pending,
            priority: draft.priority,
            feedback: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Set the status. Repeating the current status only refreshes
    /// `updated_at` and, when given, the feedback.
    pub fn moderate(
        &mut self,
        status: DeliverableStatus,
        feedback: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.status = status;
        if feedback.is_some() {
            self.feedback = feedback;
        }
        self.updated_at = at;
    }
}

/// A deliverable as produced by synthesis, before it gets an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverableDraft {
    pub kind: String,
    pub title: String,
    pub content: String,
    pub priority: Priority,
}

impl DeliverableDraft {
    pub fn new(
        kind: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            content: content.into(),
            priority,
        }
    }
}
