//! Repository flattener REST API
//!
//! This crate exposes the repository flattener over HTTP: repository structure,
//! selected file contents, whole-repository conversion and language statistics.
//!
//! # Architecture
//!
//! This crate exists in the HTTP layer and handles:
//! - HTTP request/response translation
//! - Error mapping from domain to HTTP
//! - Routing, CORS and server configuration
//!
//! **CRITICAL**: This crate must never be imported by business logic.
//! The dependency flows: HTTP API → Business Logic, never the reverse.

use std::sync::Arc;

use repo_flattener_core::RepositoryFlattener;

pub mod config;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use config::{ConfigError, ServiceConfig};
pub use errors::{ApiError, ErrorResponse};
pub use models::{request, response};
pub use server::{ApiConfig, ApiServer};

/// API version
pub const API_VERSION: &str = "v1";

/// Default API port
pub const DEFAULT_PORT: u16 = 8080;

/// Application state shared across handlers
///
/// A single flattener serves every request so its caches are shared.
#[derive(Clone)]
pub struct AppState {
    pub flattener: Arc<RepositoryFlattener>,
}

impl AppState {
    /// Create new application state around a flattener
    pub fn new(flattener: Arc<RepositoryFlattener>) -> Self {
        Self { flattener }
    }
}
