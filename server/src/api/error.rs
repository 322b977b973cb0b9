//! Use-case errors mapped to HTTP responses, in one place

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use newsroom_application::{
    AnalysisError, AutopilotError, ConfigStoreError, PlannerError, SessionError, StoreError,
};
use newsroom_domain::DomainError;
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    Store(String),
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => domain_status(e),
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    if error.is_not_found() {
        return StatusCode::NOT_FOUND;
    }
    match error {
        DomainError::TeamNotInitialized
        | DomainError::CoordinatorMissing(_)
        | DomainError::InvalidTransition { .. }
        | DomainError::SessionNotApproved(_)
        | DomainError::NoApprovedDeliverables(_) => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Domain(e) => e.to_string(),
            ApiError::Store(detail) => {
                error!("Store failure: {}", detail);
                "storage failure".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e.to_string())
    }
}

macro_rules! from_use_case_error {
    ($($ty:ident),+) => {$(
        impl From<$ty> for ApiError {
            fn from(e: $ty) -> Self {
                match e {
                    $ty::Domain(d) => ApiError::Domain(d),
                    $ty::Store(s) => ApiError::from(s),
                }
            }
        }
    )+};
}

from_use_case_error!(SessionError, PlannerError, AnalysisError, ConfigStoreError);

impl From<AutopilotError> for ApiError {
    fn from(e: AutopilotError) -> Self {
        match e {
            AutopilotError::Domain(d) => ApiError::Domain(d),
            AutopilotError::Store(s) => ApiError::from(s),
            AutopilotError::Session(s) => ApiError::from(s),
        }
    }
}
