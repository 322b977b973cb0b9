//! Autopilot, notification settings and compiled analysis

use super::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use newsroom_domain::{
    AutopilotConfig, AutopilotPatch, CompiledAnalysis, NotificationPatch, NotificationSettings,
    TickOutcome,
};

pub async fn get_autopilot(State(state): State<AppState>) -> ApiResult<AutopilotConfig> {
    Ok(Json(state.autopilot.config().await?))
}

pub async fn update_autopilot(
    State(state): State<AppState>,
    Json(patch): Json<AutopilotPatch>,
) -> ApiResult<AutopilotConfig> {
    Ok(Json(state.autopilot.update(&patch).await?))
}

/// Polled by an external cron
pub async fn tick(State(state): State<AppState>) -> ApiResult<TickOutcome> {
    Ok(Json(state.autopilot.tick().await?))
}

pub async fn get_notifications(State(state): State<AppState>) -> ApiResult<NotificationSettings> {
    Ok(Json(state.notifier.settings().await?))
}

pub async fn update_notifications(
    State(state): State<AppState>,
    Json(patch): Json<NotificationPatch>,
) -> ApiResult<NotificationSettings> {
    Ok(Json(state.notifier.update_settings(&patch).await?))
}

pub async fn latest_analysis(State(state): State<AppState>) -> ApiResult<Option<CompiledAnalysis>> {
    Ok(Json(state.analysis.latest().await?))
}

pub async fn compile_analysis(State(state): State<AppState>) -> ApiResult<CompiledAnalysis> {
    Ok(Json(state.analysis.execute().await?))
}
