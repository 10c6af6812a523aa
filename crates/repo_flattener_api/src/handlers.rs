//! HTTP request handlers
//!
//! Each handler:
//! 1. Extracts the JSON body
//! 2. Rejects a blank repository URL
//! 3. Calls the flattener
//! 4. Translates the domain result to a response model
//!
//! Domain errors become HTTP errors through [`ApiError`].

use axum::{extract::State, Json};
use repo_flattener_core::ExtensionFilter;
use serde::{Deserialize, Serialize};

use crate::{
    errors::ApiError,
    extract::ApiJson,
    models::{request::*, response::*},
    AppState,
};

/// POST /api/v1/structure
///
/// Lists every file of the repository, flat or folded into directories.
pub async fn get_structure(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<StructureRequest>,
) -> Result<Json<StructureResponse>, ApiError> {
    let repo_url = require_repo_url(&request.repo_url)?;
    let reference = request.reference.as_deref();

    let response: StructureResponse = if request.nested {
        state
            .flattener
            .get_nested_structure(repo_url, reference)
            .await?
            .into()
    } else {
        state.flattener.get_structure(repo_url, reference).await?.into()
    };
    Ok(Json(response))
}

/// POST /api/v1/browse
///
/// Builds the nested listing one directory at a time.
pub async fn browse_structure(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BrowseRequest>,
) -> Result<Json<StructureResponse>, ApiError> {
    let repo_url = require_repo_url(&request.repo_url)?;
    let structure = state
        .flattener
        .browse_structure(repo_url, request.reference.as_deref())
        .await?;
    Ok(Json(structure.into()))
}

/// POST /api/v1/directory
///
/// Lists a single directory level for incremental browsing.
pub async fn list_directory(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DirectoryRequest>,
) -> Result<Json<DirectoryResponse>, ApiError> {
    let repo_url = require_repo_url(&request.repo_url)?;
    let listing = state
        .flattener
        .list_directory(
            repo_url,
            request.reference.as_deref(),
            request.tree_sha.as_deref(),
            &request.path,
        )
        .await?;
    Ok(Json(listing.into()))
}

/// POST /api/v1/selected-files
///
/// Concatenates the chosen files. A file that cannot be fetched is reported in
/// place and never fails the request.
pub async fn get_selected_files(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SelectedFilesRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
    let repo_url = require_repo_url(&request.repo_url)?;
    let filter = ExtensionFilter::new().excluding(&request.excluded_types);

    let selected = state
        .flattener
        .select_files(
            repo_url,
            &request.paths,
            &filter,
            request.reference.as_deref(),
        )
        .await?;

    Ok(Json(ContentResponse {
        content: selected.render(),
        commit_hash: selected.commit.to_string(),
    }))
}

/// POST /api/v1/convert
///
/// Flattens every file that passes the include and exclude lists.
pub async fn convert_repository(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let repo_url = require_repo_url(&request.repo_url)?;
    let filter = ExtensionFilter::new()
        .including(&request.file_types.include_types)
        .excluding(&request.file_types.exclude_types);

    let converted = state
        .flattener
        .convert_repository(repo_url, &filter, request.reference.as_deref())
        .await?;
    Ok(Json(converted.into()))
}

/// POST /api/v1/fetch-repo
///
/// Returns every listed file keyed by path.
pub async fn fetch_repository(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RepositoryRequest>,
) -> Result<Json<FetchRepoResponse>, ApiError> {
    let repo_url = require_repo_url(&request.repo_url)?;
    let data = state.flattener.get_repo_data(repo_url).await?;
    Ok(Json(data.into()))
}

/// POST /api/v1/languages
pub async fn get_languages(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RepositoryRequest>,
) -> Result<Json<LanguagesResponse>, ApiError> {
    let repo_url = require_repo_url(&request.repo_url)?;
    let languages = state.flattener.get_languages(repo_url).await?;
    Ok(Json(LanguagesResponse { languages }))
}

/// GET /api/v1/health
///
/// Health check endpoint (no upstream calls)
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
        error: None,
    })
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Service status: "healthy" or "unhealthy"
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Current timestamp (ISO 8601)
    pub timestamp: String,

    /// Error message (if unhealthy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
