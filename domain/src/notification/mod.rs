//! Notification settings and message formatting.
//!
//! Delivery itself is an external concern; this module decides whether a
//! message should go out and what it says.

use crate::session::deliverable::Deliverable;
use crate::session::entities::Session;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    #[default]
    Html,
    Plain,
}

impl MessageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFormat::Html => "HTML",
            MessageFormat::Plain => "plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub chat_id: Option<String>,
    pub enabled: bool,
    pub send_on_complete: bool,
    pub send_on_approve: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            chat_id: None,
            enabled: false,
            send_on_complete: true,
            send_on_approve: true,
        }
    }
}

/// Which lifecycle event a message is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    SessionCompleted,
    SessionApproved,
}

impl NotificationSettings {
    /// Destination for `event`, or `None` when nothing should be sent
    pub fn destination_for(&self, event: NotificationEvent) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        let wanted = match event {
            NotificationEvent::SessionCompleted => self.send_on_complete,
            NotificationEvent::SessionApproved => self.send_on_approve,
        };
        if !wanted {
            return None;
        }
        self.chat_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn apply_patch(&mut self, patch: &NotificationPatch) {
        if let Some(chat_id) = &patch.chat_id {
            let trimmed = chat_id.trim();
            self.chat_id = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(v) = patch.send_on_complete {
            self.send_on_complete = v;
        }
        if let Some(v) = patch.send_on_approve {
            self.send_on_approve = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatch {
    pub chat_id: Option<String>,
    pub enabled: Option<bool>,
    pub send_on_complete: Option<bool>,
    pub send_on_approve: Option<bool>,
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

fn deliverable_lines(deliverables: &[Deliverable]) -> String {
    deliverables
        .iter()
        .map(|d| format!("• {} <i>({})</i>", escape_html(&d.title), d.kind))
        .collect::<Vec<_>>()
        .join("\n")
}

/// HTML message announcing a completed session awaiting review
pub fn completion_message(session: &Session, deliverables: &[Deliverable]) -> String {
    let mut text = format!(
        "<b>{} session completed</b>\nTopic: {}\n",
        session.session_type.display_name(),
        escape_html(&session.topic)
    );
    if let Some(summary) = &session.coordinator_summary {
        text.push_str(&format!("\n{}\n", escape_html(summary)));
    }
    if !deliverables.is_empty() {
        text.push_str(&format!(
            "\n<b>Deliverables ({})</b>\n{}\n",
            deliverables.len(),
            deliverable_lines(deliverables)
        ));
    }
    text.push_str("\nAwaiting review.");
    text
}

/// HTML message announcing an approved session
pub fn approval_message(session: &Session, approved: &[Deliverable]) -> String {
    let mut text = format!(
        "<b>Session approved</b>\n{}: {}\n",
        session.session_type.display_name(),
        escape_html(&session.topic)
    );
    if let Some(feedback) = session.feedback.as_deref().filter(|f| !f.is_empty()) {
        text.push_str(&format!("Feedback: {}\n", escape_html(feedback)));
    }
    if !approved.is_empty() {
        text.push_str(&format!(
            "\n<b>Approved ({})</b>\n{}",
            approved.len(),
            deliverable_lines(approved)
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::deliverable::{DeliverableDraft, Priority};
    use crate::session::entities::SessionType;
    use chrono::Utc;

    fn enabled() -> NotificationSettings {
        NotificationSettings {
            chat_id: Some("-100123".into()),
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn destination_requires_enabled_flag_and_chat_id() {
        assert_eq!(
            enabled().destination_for(NotificationEvent::SessionCompleted),
            Some("-100123")
        );

        let mut s = enabled();
        s.send_on_approve = false;
        assert_eq!(s.destination_for(NotificationEvent::SessionApproved), None);

        let s = NotificationSettings {
            chat_id: None,
            ..enabled()
        };
        assert_eq!(s.destination_for(NotificationEvent::SessionCompleted), None);

        assert_eq!(
            NotificationSettings::default().destination_for(NotificationEvent::SessionCompleted),
            None
        );
    }

    #[test]
    fn patch_with_blank_chat_id_clears_it() {
        let mut s = enabled();
        s.apply_patch(&NotificationPatch {
            chat_id: Some("  ".into()),
            ..Default::default()
        });
        assert_eq!(s.chat_id, None);
        assert!(s.enabled);
    }

    #[test]
    fn completion_message_lists_titles_escaped() {
        let now = Utc::now();
        let mut session = Session::new("s1", SessionType::Rubric, "Jazz & blues", vec![], now);
        session.coordinator_summary = Some("Two <new> rubrics".into());
        let d = Deliverable::pending(
            "d1",
            "s1",
            DeliverableDraft::new("rubric", "Late <night> jazz", "c", Priority::High),
            now,
        );
        let text = completion_message(&session, &[d]);
        assert!(text.contains("Jazz &amp; blues"));
        assert!(text.contains("Two &lt;new&gt; rubrics"));
        assert!(text.contains("Late &lt;night&gt; jazz"));
        assert!(text.contains("Deliverables (1)"));
    }
}
