//! Moderation and session queries
//!
//! Session approval cascades to the session's still-pending deliverables;
//! rejection does not. Deliverables can be moderated on their own at any
//! time, independently of their session's status.

use crate::stores::EditorialRepository;
use crate::use_cases::notify::Notifier;
use crate::use_cases::run_session::SessionError;
use chrono::Utc;
use newsroom_domain::{Deliverable, DeliverableStatus, DomainError, Session, TranscriptMessage};
use tracing::info;

pub struct ModerationUseCase {
    repo: EditorialRepository,
    notifier: Notifier,
}

impl ModerationUseCase {
    pub fn new(repo: EditorialRepository, notifier: Notifier) -> Self {
        Self { repo, notifier }
    }

    // ==================== Sessions ====================

    pub async fn session(&self, id: &str) -> Result<Session, SessionError> {
        self.repo
            .session(id)
            .await?
            .ok_or_else(|| DomainError::SessionNotFound(id.to_string()).into())
    }

    pub async fn list_sessions(&self, limit: Option<usize>) -> Result<Vec<Session>, SessionError> {
        Ok(self.repo.list_sessions(limit).await?)
    }

    pub async fn transcript(&self, id: &str) -> Result<Vec<TranscriptMessage>, SessionError> {
        self.session(id).await?;
        Ok(self.repo.transcript(id).await?)
    }

    /// `completed → approved`, approving every pending deliverable
    pub async fn approve_session(
        &self,
        id: &str,
        feedback: Option<String>,
    ) -> Result<Session, SessionError> {
        let mut session = self.session(id).await?;
        session.approve(feedback)?;

        let now = Utc::now();
        let mut approved = Vec::new();
        for mut deliverable in self.repo.deliverables_of(&session).await? {
            if deliverable.status == DeliverableStatus::Pending {
                deliverable.moderate(DeliverableStatus::Approved, None, now);
                self.repo.save_deliverable(&deliverable).await?;
            }
            if deliverable.status == DeliverableStatus::Approved {
                approved.push(deliverable);
            }
        }
        self.repo.save_session(&session).await?;
        info!(session_id = %id, approved = approved.len(), "Session approved");

        self.notifier.session_approved(&session, &approved).await;
        Ok(session)
    }

    /// `completed → rejected`; deliverables keep their status
    pub async fn reject_session(
        &self,
        id: &str,
        feedback: Option<String>,
    ) -> Result<Session, SessionError> {
        let mut session = self.session(id).await?;
        session.reject(feedback)?;
        self.repo.save_session(&session).await?;
        info!(session_id = %id, "Session rejected");
        Ok(session)
    }

    /// Delete a session with its transcript and deliverables
    pub async fn purge_session(&self, id: &str) -> Result<(), SessionError> {
        if !self.repo.purge_session(id).await? {
            return Err(DomainError::SessionNotFound(id.to_string()).into());
        }
        info!(session_id = %id, "Session purged");
        Ok(())
    }

    // ==================== Deliverables ====================

    pub async fn list_deliverables(
        &self,
        session_id: Option<&str>,
    ) -> Result<Vec<Deliverable>, SessionError> {
        Ok(self.repo.list_deliverables(session_id).await?)
    }

    pub async fn approve_deliverable(
        &self,
        id: &str,
        feedback: Option<String>,
    ) -> Result<Deliverable, SessionError> {
        self.moderate(id, DeliverableStatus::Approved, feedback).await
    }

    pub async fn reject_deliverable(
        &self,
        id: &str,
        feedback: Option<String>,
    ) -> Result<Deliverable, SessionError> {
        self.moderate(id, DeliverableStatus::Rejected, feedback).await
    }

    async fn moderate(
        &self,
        id: &str,
        status: DeliverableStatus,
        feedback: Option<String>,
    ) -> Result<Deliverable, SessionError> {
        let mut deliverable = self
            .repo
            .deliverable(id)
            .await?
            .ok_or_else(|| DomainError::DeliverableNotFound(id.to_string()))?;
        deliverable.moderate(status, feedback, Utc::now());
        self.repo.save_deliverable(&deliverable).await?;
        info!(deliverable_id = %id, status = status.as_str(), "Deliverable moderated");
        Ok(deliverable)
    }
}
