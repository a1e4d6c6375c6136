use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use uuid::Uuid;

use crate::server::state::StateError;

/// Failure of a `/api/tasks` request, rendered as a plain-text response.
#[derive(Debug)]
pub enum ServiceError {
    TaskNotFound(Uuid),
    Storage(StateError),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::TaskNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("task `{}` not found", id)).into_response()
            }
            ServiceError::Storage(cause) => {
                error!(error = %cause, "task storage failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("task storage failed: {}", cause),
                )
                    .into_response()
            }
        }
    }
}

impl From<StateError> for ServiceError {
    fn from(error: StateError) -> Self {
        match error {
            StateError::NotFound(id) => ServiceError::TaskNotFound(id),
            cause => ServiceError::Storage(cause),
        }
    }
}
