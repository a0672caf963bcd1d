//! HTTP error type rendering the failure envelope

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::shared::types::{error_codes, ApiResponse, ContractError, EmptyData};

/// Failure with an HTTP status, a stable code and a message.
///
/// Renders as `{"success": false, "error": {"code", "message"}}`.
#[derive(Debug, Clone, Error)]
#[error("{status} {code}: {message}")]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::BAD_REQUEST, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::VALIDATION_ERROR,
            message,
        )
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error_codes::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, error_codes::RATE_LIMITED, message)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, error_codes::NOT_IMPLEMENTED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            message,
        )
    }

    /// Replaces the generic code, e.g. `NOT_FOUND` -> `TEACHER_NOT_FOUND`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ContractError> for ApiError {
    fn from(err: ContractError) -> Self {
        match &err {
            ContractError::InvalidSortField { .. } => {
                Self::bad_request(err.to_string()).with_code(error_codes::INVALID_SORT_FIELD)
            }
            ContractError::Normalization(_) => {
                Self::internal(err.to_string()).with_code(error_codes::NORMALIZATION_ERROR)
            }
            ContractError::InvalidFormat(_) => {
                Self::internal(err.to_string()).with_code(error_codes::RESPONSE_FORMAT_ERROR)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<EmptyData>::error(self.code, self.message);
        (self.status, Json(body)).into_response()
    }
}
