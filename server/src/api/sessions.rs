//! Sessions, transcripts and deliverables

use super::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use newsroom_application::RunSessionInput;
use newsroom_domain::{Deliverable, ImplementationTask, Session, SessionType, TranscriptMessage};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[serde(rename = "type")]
    pub session_type: String,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRunResponse {
    pub session: Session,
    pub transcript: Vec<TranscriptMessage>,
    pub deliverables: Vec<Deliverable>,
    pub ai_synthesis: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverableQuery {
    pub session_id: Option<String>,
}

pub async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> ApiResult<SessionRunResponse> {
    let session_type: SessionType = request.session_type.parse()?;
    let mut input = RunSessionInput::new(session_type);
    if let Some(topic) = request.topic {
        input = input.with_topic(topic);
    }
    let run = state.sessions.execute(input).await?;
    info!(session_id = %run.session.id, "Session run via API");
    Ok(Json(SessionRunResponse {
        session: run.session,
        transcript: run.transcript,
        deliverables: run.deliverables,
        ai_synthesis: run.ai_synthesis,
    }))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Session>> {
    Ok(Json(state.moderation.list_sessions(query.limit).await?))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Session> {
    Ok(Json(state.moderation.session(&id).await?))
}

pub async fn purge_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.moderation.purge_session(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<TranscriptMessage>> {
    Ok(Json(state.moderation.transcript(&id).await?))
}

pub async fn approve_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<FeedbackRequest>>,
) -> ApiResult<Session> {
    let feedback = body.and_then(|Json(b)| b.feedback);
    Ok(Json(state.moderation.approve_session(&id, feedback).await?))
}

pub async fn reject_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<FeedbackRequest>>,
) -> ApiResult<Session> {
    let feedback = body.and_then(|Json(b)| b.feedback);
    Ok(Json(state.moderation.reject_session(&id, feedback).await?))
}

pub async fn send_to_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ImplementationTask> {
    Ok(Json(state.planner.send_to_assistant(&id).await?))
}

// ==================== Deliverables ====================

pub async fn list_deliverables(
    State(state): State<AppState>,
    Query(query): Query<DeliverableQuery>,
) -> ApiResult<Vec<Deliverable>> {
    Ok(Json(
        state
            .moderation
            .list_deliverables(query.session_id.as_deref())
            .await?,
    ))
}

pub async fn approve_deliverable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<FeedbackRequest>>,
) -> ApiResult<Deliverable> {
    let feedback = body.and_then(|Json(b)| b.feedback);
    Ok(Json(state.moderation.approve_deliverable(&id, feedback).await?))
}

pub async fn reject_deliverable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<FeedbackRequest>>,
) -> ApiResult<Deliverable> {
    let feedback = body.and_then(|Json(b)| b.feedback);
    Ok(Json(state.moderation.reject_deliverable(&id, feedback).await?))
}
