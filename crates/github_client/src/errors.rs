//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when reading repository data
//! through the GitHub REST API. Upstream HTTP failures are classified by status code
//! so that callers can distinguish missing resources from credential problems and
//! from generic upstream failures.

use http::StatusCode;
use std::time::Duration;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// Only the `message` field of a GitHub error body is ever carried in an error value.
/// Request headers, and therefore the bearer credential, never end up in an error.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::{Error, ForgeApi};
///
/// match client.get_commit("octo", "demo", "main").await {
///     Ok(commit) => println!("Latest commit: {}", commit.sha),
///     Err(Error::NotFound(resource)) => eprintln!("Missing: {}", resource),
///     Err(Error::AuthError(msg)) => eprintln!("Authentication failed: {}", msg),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The credential was rejected (HTTP 401) or lacks access (HTTP 403).
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// The requested resource was not found (HTTP 404).
    ///
    /// The contained string names the repository, ref or path that was requested.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// GitHub API rate limit has been exceeded.
    ///
    /// Reported for HTTP 429 and for HTTP 403 responses whose message mentions
    /// the rate limit.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The request did not complete within the configured timeout.
    #[error("Request to GitHub timed out after {0:?}")]
    Timeout(Duration),

    /// Any other non-success response or transport failure.
    ///
    /// `status` is `None` when no HTTP response was received.
    #[error("GitHub API request failed{}: {message}", describe_status(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl Error {
    /// Classifies a non-success GitHub response.
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status returned by GitHub
    /// * `message` - The `message` field of the GitHub error body
    /// * `resource` - Human readable name of what was requested, used for `NotFound`
    pub fn from_status(status: StatusCode, message: &str, resource: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => Error::NotFound(resource.to_string()),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded,
            StatusCode::FORBIDDEN if message.to_ascii_lowercase().contains("rate limit") => {
                Error::RateLimitExceeded
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Error::AuthError(message.to_string())
            }
            _ => Error::Upstream {
                status: Some(status.as_u16()),
                message: message.to_string(),
            },
        }
    }

    /// Returns the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound(_) => Some(404),
            Error::RateLimitExceeded => Some(429),
            Error::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {}", code),
        None => String::new(),
    }
}
