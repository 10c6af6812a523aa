//! HTTP routing configuration
//!
//! This module defines all HTTP routes and their corresponding handlers.
//!
//! # Route Structure
//!
//! All routes are prefixed with `/api/v1`:
//!
//! - GET    /api/v1/health - Health check
//! - POST   /api/v1/structure - Flat or nested file listing
//! - POST   /api/v1/browse - Nested listing walked one directory at a time
//! - POST   /api/v1/directory - A single directory level
//! - POST   /api/v1/selected-files - Concatenated content of chosen files
//! - POST   /api/v1/convert - Whole repository flattened into one document
//! - POST   /api/v1/fetch-repo - Every file keyed by path
//! - POST   /api/v1/languages - Language statistics

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{handlers, middleware as api_middleware, server::ApiConfig, AppState};

/// Create the complete API router with all routes configured.
///
/// This function sets up:
/// - All endpoint routes
/// - CORS configuration
/// - Request tracing
/// - Timeout handling
pub fn create_router(state: AppState, config: &ApiConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&config.cors_allow_origin))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
        // Cache preflight responses for 1 hour
        .max_age(Duration::from_secs(3600));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(false))
        .on_response(DefaultOnResponse::new().include_headers(false));

    let timeout_layer = TimeoutLayer::new(config.request_timeout);

    let api_v1 = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/structure", post(handlers::get_structure))
        .route("/browse", post(handlers::browse_structure))
        .route("/directory", post(handlers::list_directory))
        .route("/selected-files", post(handlers::get_selected_files))
        .route("/convert", post(handlers::convert_repository))
        .route("/fetch-repo", post(handlers::fetch_repository))
        .route("/languages", post(handlers::get_languages))
        .layer(timeout_layer)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state);

    // Root router with API version prefix. The request id wraps everything,
    // including unmatched routes and timed out requests.
    Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
}

/// Builds the CORS origin policy from a comma separated list or `*`.
///
/// Entries that are not valid header values are ignored with a warning.
pub fn allowed_origins(setting: &str) -> AllowOrigin {
    if setting.split(',').any(|origin| origin.trim() == "*") {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = setting
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(origins)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
