//! HTTP request type definitions
//!
//! Every request names the repository by URL. Fields are camelCase on the wire;
//! `repo_url` is accepted as well for clients that send snake_case.

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Body of `POST /structure`.
///
/// ```json
/// { "repoUrl": "https://github.com/octo/demo", "ref": "main", "nested": true }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRequest {
    #[serde(alias = "repo_url")]
    pub repo_url: String,

    /// Branch name or commit hash; overrides a ref in the URL
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Return a nested tree instead of a flat listing
    #[serde(default)]
    pub nested: bool,
}

/// Body of `POST /browse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseRequest {
    #[serde(alias = "repo_url")]
    pub repo_url: String,

    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Body of `POST /directory`.
///
/// Without `treeSha` the repository root is listed. Otherwise `treeSha` and
/// `path` come from a directory entry of a previous listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRequest {
    #[serde(alias = "repo_url")]
    pub repo_url: String,

    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, alias = "tree_sha", skip_serializing_if = "Option::is_none")]
    pub tree_sha: Option<String>,

    #[serde(default)]
    pub path: String,
}

/// Body of `POST /selected-files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFilesRequest {
    #[serde(alias = "repo_url")]
    pub repo_url: String,

    /// Paths to concatenate, in output order
    pub paths: Vec<String>,

    /// Extensions to skip, with or without the leading `.`
    #[serde(default, alias = "excluded_types")]
    pub excluded_types: Vec<String>,

    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Include and exclude lists of `POST /convert`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypes {
    #[serde(default, alias = "include_types")]
    pub include_types: Vec<String>,

    #[serde(default, alias = "exclude_types")]
    pub exclude_types: Vec<String>,
}

/// Body of `POST /convert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    #[serde(alias = "repo_url")]
    pub repo_url: String,

    #[serde(default, alias = "file_types")]
    pub file_types: FileTypes,

    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Body of `POST /fetch-repo` and `POST /languages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRequest {
    #[serde(alias = "repo_url")]
    pub repo_url: String,
}

/// Rejects a blank repository URL before any upstream call.
pub fn require_repo_url(repo_url: &str) -> Result<&str, ApiError> {
    let trimmed = repo_url.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation_error(
            "repoUrl",
            "Repository URL is required",
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
