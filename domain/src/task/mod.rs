//! Implementation tasks derived from approved deliverables.
//!
//! A task's status is computed from its steps; the only way to mark a task
//! `completed` while steps are still open is [`ImplementationTask::override_status`].

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStep {
    pub step: String,
    pub assignee: String,
    pub deadline: String,
    pub status: StepStatus,
}

impl TaskStep {
    pub fn new(
        step: impl Into<String>,
        assignee: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            step: step.into(),
            assignee: assignee.into(),
            deadline: deadline.into(),
            status: StepStatus::Pending,
        }
    }
}

/// The plan as produced by the coordinator (or the template), before it gets an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDraft {
    pub title: String,
    pub plan: String,
    pub steps: Vec<TaskStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationTask {
    pub id: String,
    pub session_id: String,
    pub deliverable_ids: Vec<String>,
    pub title: String,
    pub plan: String,
    pub steps: Vec<TaskStep>,
    pub status: TaskStatus,
    #[serde(default)]
    pub status_overridden: bool,
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImplementationTask {
    pub fn new(
        id: impl Into<String>,
        session_id: impl Into<String>,
        deliverable_ids: Vec<String>,
        draft: PlanDraft,
        is_ai_generated: bool,
        at: DateTime<Utc>,
    ) -> Self {
        let mut task = Self {
            id: id.into(),
            session_id: session_id.into(),
            deliverable_ids,
            title: draft.title,
            plan: draft.plan,
            steps: draft
                .steps
                .into_iter()
                .map(|s| TaskStep {
                    status: StepStatus::Pending,
                    ..s
                })
                .collect(),
            status: TaskStatus::Pending,
            status_overridden: false,
            is_ai_generated,
            created_at: at,
            updated_at: at,
        };
        task.recompute_status();
        task
    }

    /// Status implied by the steps alone
    pub fn computed_status(&self) -> TaskStatus {
        if !self.steps.is_empty() && self.steps.iter().all(|s| s.status == StepStatus::Done) {
            TaskStatus::Completed
        } else if self.steps.iter().any(|s| s.status != StepStatus::Pending) {
            TaskStatus::InProgress
        } else {
            TaskStatus::Pending
        }
    }

    fn recompute_status(&mut self) {
        self.status = self.computed_status();
        self.status_overridden = false;
    }

    /// Update one step; the task status is recomputed and any override dropped
    pub fn update_step(
        &mut self,
        index: usize,
        status: StepStatus,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let (id, len) = (self.id.clone(), self.steps.len());
        let step = self.steps.get_mut(index).ok_or_else(|| {
            DomainError::InvalidInput(format!("task {id} has no step {index} ({len} steps)"))
        })?;
        step.status = status;
        self.recompute_status();
        self.updated_at = at;
        Ok(())
    }

    /// Explicit operator override of the task-level status
    pub fn override_status(&mut self, status: TaskStatus, at: DateTime<Utc>) {
        self.status = status;
        self.status_overridden = status != self.computed_status();
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> ImplementationTask {
        ImplementationTask::new(
            "t1",
            "s1",
            vec!["d1".into()],
            PlanDraft {
                title: "Launch".into(),
                plan: "Do it".into(),
                steps: vec![
                    TaskStep::new("Write script", "host", "Friday"),
                    TaskStep {
                        status: StepStatus::Done,
                        ..TaskStep::new("Book studio", "sound_engineer", "Monday")
                    },
                ],
            },
            true,
            Utc::now(),
        )
    }

    #[test]
    fn steps_always_start_pending() {
        let t = task();
        assert!(t.steps.iter().all(|s| s.status == StepStatus::Pending));
        assert_eq!(t.status, TaskStatus::Pending);
    }

    #[test]
    fn completed_only_when_every_step_done() {
        let mut t = task();
        t.update_step(0, StepStatus::Done, Utc::now()).unwrap();
        assert_eq!(t.status, TaskStatus::InProgress);
        t.update_step(1, StepStatus::Done, Utc::now()).unwrap();
        assert_eq!(t.status, TaskStatus::Completed);
        t.update_step(1, StepStatus::InProgress, Utc::now()).unwrap();
        assert_eq!(t.status, TaskStatus::InProgress);
    }

    #[test]
    fn override_marks_flag_until_next_step_update() {
        let mut t = task();
        t.override_status(TaskStatus::Completed, Utc::now());
        assert_eq!(t.status, TaskStatus::Completed);
        assert!(t.status_overridden);
        t.update_step(0, StepStatus::InProgress, Utc::now()).unwrap();
        assert_eq!(t.status, TaskStatus::InProgress);
        assert!(!t.status_overridden);
    }

    #[test]
    fn out_of_range_step_is_invalid_input() {
        let mut t = task();
        match t.update_step(9, StepStatus::Done, Utc::now()) {
            Err(DomainError::InvalidInput(msg)) => {
                assert_eq!(msg, "task t1 has no step 9 (2 steps)");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(t.steps.iter().all(|s| s.status == StepStatus::Pending));
    }
}
