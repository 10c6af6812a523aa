//! Error types for the repository flattener.
//!
//! Request-level operations (structure, full conversion) fail fast with these
//! errors. Per-file operations capture them next to the file they belong to so a
//! single missing file never fails a batch.

use std::time::Duration;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Result type used throughout the flattener core.
pub type FlattenResult<T> = Result<T, Error>;

/// Errors raised while resolving, walking or reading a repository.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The repository URL could not be parsed or names fewer than two path segments.
    #[error("Invalid repository URL: {0}")]
    InvalidUrl(String),

    /// The repository, ref or path does not exist upstream.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The credential was rejected or lacks access to the repository.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The upstream rate limit is exhausted.
    #[error("GitHub rate limit exceeded")]
    RateLimited,

    /// Any other upstream failure.
    #[error("Upstream request failed{}: {message}", describe_status(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// An upstream call did not complete in time.
    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    /// The upstream payload for a file could not be decoded.
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    /// The forge refused to deliver the file inline because of its size.
    #[error("File {path} is too large to fetch ({size} bytes)")]
    FileTooLarge { path: String, size: u64 },
}

impl From<github_client::Error> for Error {
    fn from(err: github_client::Error) -> Self {
        match err {
            github_client::Error::AuthError(message) => Error::Auth(message),
            github_client::Error::NotFound(resource) => Error::NotFound(resource),
            github_client::Error::RateLimitExceeded => Error::RateLimited,
            github_client::Error::Timeout(after) => Error::Timeout(after),
            github_client::Error::InvalidResponse(message) => Error::Upstream {
                status: None,
                message,
            },
            github_client::Error::Upstream { status, message } => {
                Error::Upstream { status, message }
            }
        }
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {}", code),
        None => String::new(),
    }
}
