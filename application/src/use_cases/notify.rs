//! Notification dispatch and settings.
//!
//! Sink failures are logged and swallowed; they never fail the operation
//! that triggered them.

use crate::ports::kv_store::StoreError;
use crate::ports::notifier::NotificationSink;
use crate::stores::SettingsRepository;
use newsroom_domain::notification::{approval_message, completion_message};
use newsroom_domain::{
    Deliverable, MessageFormat, NotificationEvent, NotificationPatch, NotificationSettings,
    Session,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct Notifier {
    sink: Option<Arc<dyn NotificationSink>>,
    settings: SettingsRepository,
}

impl Notifier {
    pub fn new(sink: Option<Arc<dyn NotificationSink>>, settings: SettingsRepository) -> Self {
        Self { sink, settings }
    }

    pub async fn settings(&self) -> Result<NotificationSettings, StoreError> {
        self.settings.notifications().await
    }

    pub async fn update_settings(
        &self,
        patch: &NotificationPatch,
    ) -> Result<NotificationSettings, StoreError> {
        let mut current = self.settings.notifications().await?;
        current.apply_patch(patch);
        self.settings.save_notifications(&current).await?;
        info!(enabled = current.enabled, "Notification settings updated");
        Ok(current)
    }

    pub async fn session_completed(&self, session: &Session, deliverables: &[Deliverable]) {
        let text = completion_message(session, deliverables);
        self.dispatch(NotificationEvent::SessionCompleted, &session.id, &text)
            .await;
    }

    pub async fn session_approved(&self, session: &Session, approved: &[Deliverable]) {
        let text = approval_message(session, approved);
        self.dispatch(NotificationEvent::SessionApproved, &session.id, &text)
            .await;
    }

    /// Returns whether a message was delivered
    async fn dispatch(&self, event: NotificationEvent, session_id: &str, text: &str) -> bool {
        let Some(sink) = &self.sink else {
            return false;
        };
        let settings = match self.settings.notifications().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(session_id = %session_id, "Could not read notification settings: {}", e);
                return false;
            }
        };
        let Some(destination) = settings.destination_for(event) else {
            debug!(session_id = %session_id, ?event, "Notification not wanted");
            return false;
        };
        match sink.send_message(destination, text, MessageFormat::Html).await {
            Ok(()) => {
                info!(session_id = %session_id, ?event, "Notification sent");
                true
            }
            Err(e) => {
                warn!(session_id = %session_id, ?event, "Notification failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, RecordingSink};
    use chrono::Utc;
    use newsroom_domain::SessionType;

    async fn notifier(sink: Arc<RecordingSink>, enabled: bool) -> Notifier {
        let settings = SettingsRepository::new(Arc::new(MemoryStore::default()));
        let n = Notifier::new(Some(sink as Arc<dyn NotificationSink>), settings);
        n.update_settings(&NotificationPatch {
            chat_id: Some("42".into()),
            enabled: Some(enabled),
            ..Default::default()
        })
        .await
        .unwrap();
        n
    }

    fn session() -> Session {
        Session::new("s1", SessionType::News, "Budget vote", vec![], Utc::now())
    }

    #[tokio::test]
    async fn test_sends_when_enabled() {
        let sink = Arc::new(RecordingSink::default());
        let n = notifier(sink.clone(), true).await;
        n.session_completed(&session(), &[]).await;
        let sent = sink.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "42");
        assert!(sent[0].1.contains("Budget vote"));
    }

    #[tokio::test]
    async fn test_silent_when_disabled() {
        let sink = Arc::new(RecordingSink::default());
        let n = notifier(sink.clone(), false).await;
        n.session_approved(&session(), &[]).await;
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let sink = Arc::new(RecordingSink::failing());
        let n = notifier(sink, true).await;
        assert!(
            !n.dispatch(NotificationEvent::SessionCompleted, "s1", "hi")
                .await
        );
    }
}
