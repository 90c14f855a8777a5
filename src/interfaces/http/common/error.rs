//! Domain error → HTTP response mapping
//!
//! Every failure leaves the service as `{"error": "..."}`. Store and crypto
//! faults are logged and replaced by a fixed message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::DuplicateEmail => StatusCode::CONFLICT,
            DomainError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            DomainError::AccountNotActivated => StatusCode::FORBIDDEN,
            DomainError::InvalidToken => StatusCode::NOT_FOUND,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            DomainError::Validation(msg) => msg.clone(),
            DomainError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let DomainError::Internal(detail) = &self.0 {
            error!(%detail, "Request failed with internal error");
        }
        ErrorResponse::new(self.message()).into_response_with(self.status())
    }
}
