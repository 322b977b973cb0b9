//! Agent configuration, model catalogue and direct calls

use super::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use newsroom_application::ProviderModels;
use newsroom_domain::{AgentConfig, AgentConfigPatch, CallOverride, CallResultView, Message};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub persona_id: String,
    #[serde(default)]
    pub system_prompt: String,
    pub messages: Vec<Message>,
    #[serde(default, rename = "override")]
    pub call_override: Option<CallOverride>,
}

pub async fn call_ai(
    State(state): State<AppState>,
    Json(request): Json<CallRequest>,
) -> Json<CallResultView> {
    let result = state
        .router
        .call(
            &request.persona_id,
            &request.system_prompt,
            &request.messages,
            request.call_override.as_ref(),
        )
        .await;
    Json(result.to_view())
}

pub async fn list_configs(State(state): State<AppState>) -> ApiResult<Vec<AgentConfig>> {
    Ok(Json(state.configs.list_configs().await?))
}

pub async fn get_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AgentConfig> {
    Ok(Json(state.configs.get_config(&id).await?))
}

pub async fn update_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<AgentConfigPatch>,
) -> ApiResult<AgentConfig> {
    Ok(Json(state.configs.update_config(&id, &patch).await?))
}

pub async fn reset_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AgentConfig> {
    Ok(Json(state.configs.reset_config(&id).await?))
}

pub async fn test_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CallResultView> {
    Json(state.configs.test_connection(&id).await.to_view())
}

pub async fn list_models(State(state): State<AppState>) -> Json<Vec<ProviderModels>> {
    Json(state.configs.list_models())
}
