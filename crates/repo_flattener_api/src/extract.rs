//! Request extractors

use axum::extract::FromRequest;

use crate::errors::ApiError;

/// JSON body extractor whose rejections use the API error body.
///
/// Malformed JSON, a wrong content type or a missing field answer with
/// `{"error": {...}}` and the status axum would have chosen.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
