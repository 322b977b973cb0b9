//! Implementation tasks

use super::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use newsroom_domain::{ImplementationTask, StepStatus, TaskStatus};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StepUpdate {
    pub status: StepStatus,
}

#[derive(Debug, Deserialize)]
pub struct StatusOverride {
    pub status: TaskStatus,
}

pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Vec<ImplementationTask>> {
    Ok(Json(state.planner.list_tasks().await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ImplementationTask> {
    Ok(Json(state.planner.task(&id).await?))
}

pub async fn update_step(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Json(update): Json<StepUpdate>,
) -> ApiResult<ImplementationTask> {
    Ok(Json(state.planner.update_step(&id, index, update.status).await?))
}

pub async fn override_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusOverride>,
) -> ApiResult<ImplementationTask> {
    Ok(Json(state.planner.override_status(&id, update.status).await?))
}
