//! Implementation-Task Planner
//!
//! Turns an approved session's approved deliverables into an
//! [`ImplementationTask`] drafted by the coordinator, or by the template
//! plan when the AI answer is unusable.

use crate::ports::kv_store::StoreError;
use crate::ports::roster::RosterSource;
use crate::stores::EditorialRepository;
use crate::use_cases::call_ai::CallRouter;
use chrono::Utc;
use newsroom_domain::parsing::parse_plan;
use newsroom_domain::persona::defaults::default_team;
use newsroom_domain::script::templates::template_plan;
use newsroom_domain::{
    COORDINATOR_ID, Deliverable, DeliverableStatus, DomainError, ImplementationTask, Message,
    PlanDraft, PromptTemplate, Session, SessionStatus, StepStatus, TaskStatus,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct PlanTasksUseCase {
    router: Arc<CallRouter>,
    repo: EditorialRepository,
    roster: Arc<dyn RosterSource>,
}

impl PlanTasksUseCase {
    pub fn new(
        router: Arc<CallRouter>,
        repo: EditorialRepository,
        roster: Arc<dyn RosterSource>,
    ) -> Self {
        Self {
            router,
            repo,
            roster,
        }
    }

    /// Create an implementation task from an approved session
    pub async fn send_to_assistant(
        &self,
        session_id: &str,
    ) -> Result<ImplementationTask, PlannerError> {
        let session = self
            .repo
            .session(session_id)
            .await?
            .ok_or_else(|| DomainError::SessionNotFound(session_id.to_string()))?;
        if session.status != SessionStatus::Approved {
            return Err(DomainError::SessionNotApproved(session_id.to_string()).into());
        }

        let approved: Vec<Deliverable> = self
            .repo
            .deliverables_of(&session)
            .await?
            .into_iter()
            .filter(|d| d.status == DeliverableStatus::Approved)
            .collect();
        if approved.is_empty() {
            return Err(DomainError::NoApprovedDeliverables(session_id.to_string()).into());
        }

        let (draft, is_ai_generated) = self.draft_plan(&session, &approved).await?;
        let task = ImplementationTask::new(
            Uuid::new_v4().to_string(),
            &session.id,
            approved.iter().map(|d| d.id.clone()).collect(),
            draft,
            is_ai_generated,
            Utc::now(),
        );
        self.repo.save_task(&task).await?;
        info!(
            task_id = %task.id,
            session_id = %session_id,
            steps = task.steps.len(),
            is_ai_generated,
            "Implementation task created"
        );
        Ok(task)
    }

    async fn draft_plan(
        &self,
        session: &Session,
        approved: &[Deliverable],
    ) -> Result<(PlanDraft, bool), PlannerError> {
        let mut team = self.roster.team().await?;
        if team.is_empty() {
            team = default_team();
        }
        let Some(coordinator) = team
            .iter()
            .find(|p| p.id == COORDINATOR_ID)
            .cloned()
            .or_else(|| default_team().into_iter().find(|p| p.id == COORDINATOR_ID))
        else {
            return Ok((template_plan(session, approved), false));
        };

        let system = PromptTemplate::coordinator_system(&coordinator, &team);
        let prompt = PromptTemplate::plan_request(session, approved);
        let result = self
            .router
            .call(COORDINATOR_ID, &system, &[Message::user(prompt)], None)
            .await;

        let parsed = match result.text() {
            Some(text) => parse_plan(text).map_err(|e| e.to_string()),
            None => Err(result.error().unwrap_or_default().to_string()),
        };
        Ok(match parsed {
            Ok(draft) => (draft, true),
            Err(reason) => {
                warn!(session_id = %session.id, "Plan drafting failed, using template: {}", reason);
                (template_plan(session, approved), false)
            }
        })
    }

    // ==================== Task Operations ====================

    pub async fn task(&self, id: &str) -> Result<ImplementationTask, PlannerError> {
        self.repo
            .task(id)
            .await?
            .ok_or_else(|| DomainError::TaskNotFound(id.to_string()).into())
    }

    pub async fn list_tasks(&self) -> Result<Vec<ImplementationTask>, PlannerError> {
        Ok(self.repo.list_tasks().await?)
    }

    pub async fn update_step(
        &self,
        task_id: &str,
        index: usize,
        status: StepStatus,
    ) -> Result<ImplementationTask, PlannerError> {
        let mut task = self.task(task_id).await?;
        task.update_step(index, status, Utc::now())?;
        self.repo.save_task(&task).await?;
        info!(task_id = %task_id, index, status = ?status, task_status = ?task.status, "Task step updated");
        Ok(task)
    }

    pub async fn override_status(
        &self,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<ImplementationTask, PlannerError> {
        let mut task = self.task(task_id).await?;
        task.override_status(status, Utc::now());
        self.repo.save_task(&task).await?;
        info!(task_id = %task_id, status = ?status, "Task status overridden");
        Ok(task)
    }
}
