use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::error::PlannerError;

/// Planner failure as an HTTP response carrying the structured error payload.
#[derive(Debug)]
pub struct ApiError(pub PlannerError);

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        Self(err)
    }
}

pub fn status_for(err: &PlannerError) -> StatusCode {
    match err {
        PlannerError::Form(_) | PlannerError::Booking(_) => StatusCode::BAD_REQUEST,
        PlannerError::Contract(_) | PlannerError::InvalidJson(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PlannerError::NotFound(_) => StatusCode::NOT_FOUND,
        PlannerError::RateLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
        PlannerError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        PlannerError::Provider(_)
        | PlannerError::EmptyResponse
        | PlannerError::Notification(_) => StatusCode::BAD_GATEWAY,
        PlannerError::Config(_)
        | PlannerError::Store(_)
        | PlannerError::Serialization(_)
        | PlannerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(target: "genie::http", code = self.0.error_code(), error = %self.0, "request failed");
        } else {
            warn!(target: "genie::http", code = self.0.error_code(), error = %self.0, "request rejected");
        }

        (status, Json(self.0.to_error_payload())).into_response()
    }
}
