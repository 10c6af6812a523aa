//! Error handling and HTTP error conversion
//!
//! Errors from `repo_flattener_core` are converted to HTTP responses with a status
//! code, a machine-readable code and a message. The conversion happens only at
//! the HTTP boundary.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repo_flattener_core::Error as FlattenError;
use serde::{Deserialize, Serialize};

/// Standard error response for all API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional context (optional, type varies by error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by every handler.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<Response>, ApiError> {
///     let structure = state.flattener.get_structure(url, None).await?;
///     Ok(Json(structure.into()))
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body is well formed but a field is unusable.
    #[error("validation error in field {field}: {message}")]
    Validation { field: String, message: String },

    /// The request body could not be read as the expected JSON document.
    #[error("invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error(transparent)]
    Flatten(#[from] FlattenError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    /// Create a validation error with field information
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status and error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation { .. } => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::InvalidBody { status, .. } => (*status, "InvalidRequestBody"),
            ApiError::Flatten(error) => match error {
                FlattenError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "InvalidRepositoryUrl"),
                FlattenError::Auth(_) => (StatusCode::UNAUTHORIZED, "AuthenticationError"),
                FlattenError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
                FlattenError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RateLimited"),
                FlattenError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "UpstreamTimeout"),
                FlattenError::Upstream { .. }
                | FlattenError::Decode { .. }
                | FlattenError::FileTooLarge { .. } => (StatusCode::BAD_GATEWAY, "UpstreamError"),
            },
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            ApiError::Flatten(FlattenError::Upstream {
                status: Some(status),
                ..
            }) => Some(serde_json::json!({ "upstreamStatus": status })),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        log_error(&self, status);

        let body = ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Log error with appropriate level based on HTTP status
fn log_error(error: &ApiError, status: StatusCode) {
    match status {
        StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
            tracing::error!("API error: {} - {}", status, error);
        }
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
            tracing::warn!("API error: {} - {}", status, error);
        }
        _ => {
            tracing::info!("API error: {} - {}", status, error);
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
