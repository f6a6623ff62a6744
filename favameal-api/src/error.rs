use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use diesel::r2d2::PoolError;
use favameal_service::ServiceError;
use tracing::error;

use crate::models::ApiErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Invalid token")]
    InvalidToken,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ServiceError::Validation(reason) => ApiError::BadRequest(reason),
            ServiceError::Database(_) | ServiceError::Migration(_) => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> Self {
        ApiError::InternalError(format!("database pool: {err}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason) = match self {
            ApiError::AuthenticationFailed | ApiError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason),
            ApiError::InternalError(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ApiErrorResponse { reason })).into_response()
    }
}
