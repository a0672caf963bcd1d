//! Standard response envelope
//!
//! Every REST endpoint answers with this wrapper.
//! On success: `{"success": true, "data": {...}, "message"?: "..."}`,
//! on failure: `{"success": false, "error": {"code": "...", "message": "..."}}`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Machine-readable error codes shared by the HTTP layer.
pub mod error_codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INVALID_JSON: &str = "INVALID_JSON";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INVALID_SORT_FIELD: &str = "INVALID_SORT_FIELD";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const NORMALIZATION_ERROR: &str = "NORMALIZATION_ERROR";
    pub const RESPONSE_FORMAT_ERROR: &str = "RESPONSE_FORMAT_ERROR";
}

/// Error payload of a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorBody {
    /// Stable error code, e.g. `NOT_FOUND`
    pub code: String,
    /// Human-readable description
    pub message: String,
}

/// Standard API response wrapper.
///
/// Use [`ApiResponse::success`] or [`ApiResponse::error`] to build one; the
/// constructors keep `data` and `error` mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload. Absent on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional human-readable note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error details. Absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(ApiErrorBody {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Payload for operations without return data.
///
/// Success envelopes must carry a non-null `data`, so "nothing" is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}
