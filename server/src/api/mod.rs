//! JSON HTTP surface over the use cases

mod agents;
mod error;
mod sessions;
mod settings;
mod tasks;

use crate::state::AppState;
use axum::extract::State;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use error::ApiResult;
use newsroom_domain::Persona;
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/team", get(team))
        // Calls and agent configuration
        .route("/calls", post(agents::call_ai))
        .route("/models", get(agents::list_models))
        .route("/agents", get(agents::list_configs))
        .route(
            "/agents/{id}",
            get(agents::get_config)
                .patch(agents::update_config)
                .delete(agents::reset_config),
        )
        .route("/agents/{id}/test", post(agents::test_connection))
        // Sessions and moderation
        .route(
            "/sessions",
            get(sessions::list_sessions).post(sessions::start_session),
        )
        .route(
            "/sessions/{id}",
            get(sessions::get_session).delete(sessions::purge_session),
        )
        .route("/sessions/{id}/transcript", get(sessions::transcript))
        .route("/sessions/{id}/approve", post(sessions::approve_session))
        .route("/sessions/{id}/reject", post(sessions::reject_session))
        .route("/sessions/{id}/tasks", post(sessions::send_to_assistant))
        .route("/deliverables", get(sessions::list_deliverables))
        .route(
            "/deliverables/{id}/approve",
            post(sessions::approve_deliverable),
        )
        .route(
            "/deliverables/{id}/reject",
            post(sessions::reject_deliverable),
        )
        // Implementation tasks
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/{id}", get(tasks::get_task))
        .route("/tasks/{id}/steps/{index}", patch(tasks::update_step))
        .route("/tasks/{id}/status", put(tasks::override_status))
        // Autopilot, notifications, analysis
        .route(
            "/autopilot",
            get(settings::get_autopilot).patch(settings::update_autopilot),
        )
        .route("/autopilot/tick", post(settings::tick))
        .route(
            "/notifications",
            get(settings::get_notifications).patch(settings::update_notifications),
        )
        .route(
            "/analysis",
            get(settings::latest_analysis).post(settings::compile_analysis),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn team(State(state): State<AppState>) -> ApiResult<Vec<Persona>> {
    Ok(Json(state.roster.team().await?))
}
