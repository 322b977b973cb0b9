//! Run Session use case
//!
//! Drives one editorial session end to end:
//!
//! 1. coordinator opening + one scripted line per team member
//! 2. coordinator synthesis through the Call Router
//! 3. coordinator closing line, pending deliverables, `completed`
//!
//! Synthesis never fails the session: an unusable AI answer is replaced by
//! the template synthesis built from the literal contributions.

use crate::ports::kv_store::StoreError;
use crate::ports::roster::RosterSource;
use crate::stores::EditorialRepository;
use crate::use_cases::call_ai::CallRouter;
use crate::use_cases::notify::Notifier;
use chrono::Utc;
use newsroom_domain::parsing::parse_synthesis;
use newsroom_domain::script::templates::{
    closing_message, opening_message, template_deliverables, template_synthesis,
};
use newsroom_domain::script::{pick_contribution, pick_topic};
use newsroom_domain::{
    COORDINATOR_ID, Contribution, Deliverable, DomainError, Message, Persona, PromptTemplate,
    Session, SessionStatus, SessionType, SynthesisDraft, TranscriptMessage,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Errors surfaced by session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the RunSession use case
#[derive(Debug, Clone)]
pub struct RunSessionInput {
    pub session_type: SessionType,
    /// Drawn from the type's topic pool when absent or blank
    pub topic: Option<String>,
}

impl RunSessionInput {
    pub fn new(session_type: SessionType) -> Self {
        Self {
            session_type,
            topic: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// Everything a finished session produced
#[derive(Debug, Clone)]
pub struct SessionRun {
    pub session: Session,
    pub transcript: Vec<TranscriptMessage>,
    pub deliverables: Vec<Deliverable>,
    /// Whether the synthesis came from the coordinator's AI call
    pub ai_synthesis: bool,
}

/// Use case for running an editorial session
pub struct SessionOrchestrator {
    router: Arc<CallRouter>,
    repo: EditorialRepository,
    roster: Arc<dyn RosterSource>,
    notifier: Notifier,
}

impl SessionOrchestrator {
    pub fn new(
        router: Arc<CallRouter>,
        repo: EditorialRepository,
        roster: Arc<dyn RosterSource>,
        notifier: Notifier,
    ) -> Self {
        Self {
            router,
            repo,
            roster,
            notifier,
        }
    }

    pub async fn execute(&self, input: RunSessionInput) -> Result<SessionRun, SessionError> {
        let team = self.roster.team().await?;
        if team.is_empty() {
            return Err(DomainError::TeamNotInitialized.into());
        }
        let coordinator = team
            .iter()
            .find(|p| p.id == COORDINATOR_ID)
            .cloned()
            .ok_or_else(|| DomainError::CoordinatorMissing(COORDINATOR_ID.to_string()))?;

        let session_type = input.session_type;
        let topic = match input.topic.map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => t,
            _ => pick_topic(&mut rand::thread_rng(), session_type),
        };

        let mut session = Session::new(
            Uuid::new_v4().to_string(),
            session_type,
            topic.clone(),
            team.iter().map(|p| p.id.clone()).collect(),
            Utc::now(),
        );
        self.repo.save_session(&session).await?;
        info!(session_id = %session.id, session_type = %session_type, topic = %topic, "Session started");

        // Phase 1: opening and scripted contributions. Indices are fixed
        // here, before any provider call.
        let members: Vec<&Persona> = team.iter().filter(|p| p.id != COORDINATOR_ID).collect();
        let contributions: Vec<Contribution> = {
            let mut rng = rand::thread_rng();
            members
                .iter()
                .map(|p| {
                    Contribution::new(
                        p.id.clone(),
                        p.label(),
                        pick_contribution(&mut rng, &p.id, session_type, &topic),
                    )
                })
                .collect()
        };

        let names: Vec<String> = members.iter().map(|p| p.name.clone()).collect();
        let mut transcript = vec![self.message(
            &session,
            0,
            COORDINATOR_ID,
            opening_message(session_type, &topic, &names),
            false,
        )];
        for c in &contributions {
            let index = transcript.len();
            transcript.push(self.message(&session, index, &c.persona_id, c.text.clone(), false));
        }
        for m in &transcript {
            self.repo.append_message(m).await?;
        }

        // Phase 2: synthesis
        session.transition(SessionStatus::Synthesizing)?;
        self.repo.save_session(&session).await?;
        let (draft, ai_synthesis) = self
            .synthesize(&coordinator, &team, session_type, &topic, &contributions)
            .await;

        // Phase 3: closing, deliverables, completion
        let closing = self.message(
            &session,
            transcript.len(),
            COORDINATOR_ID,
            closing_message(&draft.summary, &draft.report),
            ai_synthesis,
        );
        self.repo.append_message(&closing).await?;
        transcript.push(closing);

        let now = Utc::now();
        let mut deliverables = Vec::with_capacity(draft.deliverables.len());
        for d in draft.deliverables {
            let deliverable = Deliverable::pending(Uuid::new_v4().to_string(), &session.id, d, now);
            self.repo.save_deliverable(&deliverable).await?;
            deliverables.push(deliverable);
        }

        session.complete(
            draft.summary,
            draft.report,
            deliverables.iter().map(|d| d.id.clone()).collect(),
            transcript.len(),
            now,
        )?;
        self.repo.save_session(&session).await?;
        info!(
            session_id = %session.id,
            messages = transcript.len(),
            deliverables = deliverables.len(),
            ai_synthesis,
            "Session completed"
        );

        self.notifier
            .session_completed(&session, &deliverables)
            .await;

        Ok(SessionRun {
            session,
            transcript,
            deliverables,
            ai_synthesis,
        })
    }

    fn message(
        &self,
        session: &Session,
        index: usize,
        persona_id: &str,
        text: String,
        is_ai_generated: bool,
    ) -> TranscriptMessage {
        TranscriptMessage {
            session_id: session.id.clone(),
            index,
            persona_id: persona_id.to_string(),
            text,
            is_ai_generated,
            timestamp: Utc::now(),
        }
    }

    /// Coordinator synthesis; falls back to the template on any failure
    async fn synthesize(
        &self,
        coordinator: &Persona,
        team: &[Persona],
        session_type: SessionType,
        topic: &str,
        contributions: &[Contribution],
    ) -> (SynthesisDraft, bool) {
        let system = PromptTemplate::coordinator_system(coordinator, team);
        let prompt = PromptTemplate::synthesis_request(session_type, topic, contributions);
        let result = self
            .router
            .call(COORDINATOR_ID, &system, &[Message::user(prompt)], None)
            .await;

        let Some(text) = result.text() else {
            warn!(
                topic = %topic,
                "Synthesis call failed, using template: {}",
                result.error().unwrap_or_default()
            );
            return (template_synthesis(session_type, topic, contributions), false);
        };

        match parse_synthesis(text) {
            Ok(draft) => {
                let fill = template_deliverables(session_type, topic, contributions);
                (draft.fit_deliverables(fill), true)
            }
            Err(e) => {
                warn!(topic = %topic, "Synthesis answer unusable, using template: {}", e);
                (template_synthesis(session_type, topic, contributions), false)
            }
        }
    }
}
