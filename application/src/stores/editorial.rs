//! Sessions, transcripts, deliverables and implementation tasks

use super::{keys, load, load_all, save};
use crate::ports::kv_store::{KeyValueStore, StoreError};
use newsroom_domain::{Deliverable, ImplementationTask, Session, TranscriptMessage};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct EditorialRepository {
    store: Arc<dyn KeyValueStore>,
}

impl EditorialRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // ==================== Sessions ====================

    pub async fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        save(self.store.as_ref(), &keys::session(&session.id), session).await
    }

    pub async fn session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        load(self.store.as_ref(), &keys::session(id)).await
    }

    /// Newest first
    pub async fn list_sessions(&self, limit: Option<usize>) -> Result<Vec<Session>, StoreError> {
        let mut sessions: Vec<Session> = load_all(self.store.as_ref(), keys::SESSION).await?;
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        if let Some(limit) = limit {
            sessions.truncate(limit);
        }
        Ok(sessions)
    }

    // ==================== Transcript ====================

    pub async fn append_message(&self, message: &TranscriptMessage) -> Result<(), StoreError> {
        save(
            self.store.as_ref(),
            &keys::transcript(&message.session_id, message.index),
            message,
        )
        .await
    }

    /// Sorted by index
    pub async fn transcript(&self, session_id: &str) -> Result<Vec<TranscriptMessage>, StoreError> {
        let mut messages: Vec<TranscriptMessage> =
            load_all(self.store.as_ref(), &keys::transcript_prefix(session_id)).await?;
        messages.sort_by_key(|m| m.index);
        Ok(messages)
    }

    // ==================== Deliverables ====================

    pub async fn save_deliverable(&self, deliverable: &Deliverable) -> Result<(), StoreError> {
        save(
            self.store.as_ref(),
            &keys::deliverable(&deliverable.id),
            deliverable,
        )
        .await
    }

    pub async fn deliverable(&self, id: &str) -> Result<Option<Deliverable>, StoreError> {
        load(self.store.as_ref(), &keys::deliverable(id)).await
    }

    /// A session's deliverables in synthesis order
    pub async fn deliverables_of(&self, session: &Session) -> Result<Vec<Deliverable>, StoreError> {
        let mut deliverables = Vec::with_capacity(session.deliverable_ids.len());
        for id in &session.deliverable_ids {
            if let Some(d) = self.deliverable(id).await? {
                deliverables.push(d);
            }
        }
        Ok(deliverables)
    }

    /// Every deliverable, optionally for one session; newest first
    pub async fn list_deliverables(
        &self,
        session_id: Option<&str>,
    ) -> Result<Vec<Deliverable>, StoreError> {
        let mut deliverables: Vec<Deliverable> =
            load_all(self.store.as_ref(), keys::DELIVERABLE).await?;
        if let Some(session_id) = session_id {
            deliverables.retain(|d| d.session_id == session_id);
        }
        deliverables.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(deliverables)
    }

    // ==================== Tasks ====================

    pub async fn save_task(&self, task: &ImplementationTask) -> Result<(), StoreError> {
        save(self.store.as_ref(), &keys::task(&task.id), task).await
    }

    pub async fn task(&self, id: &str) -> Result<Option<ImplementationTask>, StoreError> {
        load(self.store.as_ref(), &keys::task(id)).await
    }

    /// Newest first
    pub async fn list_tasks(&self) -> Result<Vec<ImplementationTask>, StoreError> {
        let mut tasks: Vec<ImplementationTask> = load_all(self.store.as_ref(), keys::TASK).await?;
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    // ==================== Purge ====================

    /// Delete a session with its transcript and deliverables. Tasks derived
    /// from it have their own lifecycle and are kept.
    pub async fn purge_session(&self, id: &str) -> Result<bool, StoreError> {
        let existed = self.store.delete(&keys::session(id)).await?;

        let transcript = self.store.scan_prefix(&keys::transcript_prefix(id)).await?;
        for (key, _) in &transcript {
            self.store.delete(key).await?;
        }

        let deliverables = self.list_deliverables(Some(id)).await?;
        for d in &deliverables {
            self.store.delete(&keys::deliverable(&d.id)).await?;
        }

        debug!(
            session_id = %id,
            messages = transcript.len(),
            deliverables = deliverables.len(),
            "Purged session"
        );
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use chrono::{Duration, Utc};
    use newsroom_domain::{DeliverableDraft, Priority, SessionType};

    fn repo() -> EditorialRepository {
        EditorialRepository::new(Arc::new(MemoryStore::default()))
    }

    fn message(session_id: &str, index: usize) -> TranscriptMessage {
        TranscriptMessage {
            session_id: session_id.into(),
            index,
            persona_id: "host".into(),
            text: format!("line {index}"),
            is_ai_generated: false,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_sessions_newest_first_with_limit() {
        let repo = repo();
        let t0 = Utc::now();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            let s = Session::new(*id, SessionType::News, "t", vec![], t0 + Duration::seconds(i as i64));
            repo.save_session(&s).await.unwrap();
        }
        let ids: Vec<_> = repo
            .list_sessions(Some(2))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_transcript_sorted_by_index() {
        let repo = repo();
        for i in [11, 2, 0] {
            repo.append_message(&message("s1", i)).await.unwrap();
        }
        repo.append_message(&message("s2", 1)).await.unwrap();
        let indices: Vec<_> = repo
            .transcript("s1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.index)
            .collect();
        assert_eq!(indices, vec![0, 2, 11]);
    }

    #[tokio::test]
    async fn test_purge_removes_session_transcript_and_deliverables() {
        let repo = repo();
        let now = Utc::now();
        let mut s = Session::new("s1", SessionType::Brainstorm, "t", vec![], now);
        let d = Deliverable::pending(
            "d1",
            "s1",
            DeliverableDraft::new("idea", "T", "C", Priority::Low),
            now,
        );
        s.deliverable_ids = vec![d.id.clone()];
        repo.save_session(&s).await.unwrap();
        repo.save_deliverable(&d).await.unwrap();
        repo.append_message(&message("s1", 0)).await.unwrap();
        repo.append_message(&message("s10", 0)).await.unwrap();

        assert!(repo.purge_session("s1").await.unwrap());
        assert!(repo.session("s1").await.unwrap().is_none());
        assert!(repo.transcript("s1").await.unwrap().is_empty());
        assert!(repo.deliverable("d1").await.unwrap().is_none());
        // "s10" shares a textual prefix with "s1" but is another session
        assert_eq!(repo.transcript("s10").await.unwrap().len(), 1);
        assert!(!repo.purge_session("s1").await.unwrap());
    }
}
