//! HTTP response type definitions
//!
//! Response types convert from domain results via `From` and serialize as camelCase.

use repo_flattener_core::{
    ConvertedRepository, DirectoryListing, DirectoryNode, NestedStructure, RepoData,
    RepositoryStructure, TreeEntry,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A repository listing, flat or nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructureView {
    Flat(Vec<TreeEntry>),
    Nested(DirectoryNode),
}

/// Response of `POST /structure` and `POST /browse`.
///
/// ```json
/// {
///   "structure": [{ "path": "README.md", "type": "file", "size": 120 }],
///   "commitHash": "abc123"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureResponse {
    pub structure: StructureView,
    pub commit_hash: String,
}

impl From<RepositoryStructure> for StructureResponse {
    fn from(structure: RepositoryStructure) -> Self {
        Self {
            structure: StructureView::Flat(structure.entries),
            commit_hash: structure.commit.to_string(),
        }
    }
}

impl From<NestedStructure> for StructureResponse {
    fn from(structure: NestedStructure) -> Self {
        Self {
            structure: StructureView::Nested(structure.root),
            commit_hash: structure.commit.to_string(),
        }
    }
}

/// Response of `POST /directory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryResponse {
    pub path: String,
    pub tree_sha: String,
    pub entries: Vec<TreeEntry>,
}

impl From<DirectoryListing> for DirectoryResponse {
    fn from(listing: DirectoryListing) -> Self {
        Self {
            path: listing.path,
            tree_sha: listing.tree_sha,
            entries: listing.entries,
        }
    }
}

/// Response of `POST /selected-files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub content: String,
    pub commit_hash: String,
}

/// Response of `POST /convert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub content: String,
    pub commit_hash: String,
    pub file_count: usize,
}

impl From<ConvertedRepository> for ConvertResponse {
    fn from(converted: ConvertedRepository) -> Self {
        Self {
            content: converted.content,
            commit_hash: converted.commit.to_string(),
            file_count: converted.file_count,
        }
    }
}

/// One file of `POST /fetch-repo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoFileResponse {
    /// File text, binary placeholder or error description
    pub content: String,

    /// Extension including the leading `.`, empty when there is none
    #[serde(rename = "type")]
    pub file_type: String,

    pub size: u64,
}

/// Response of `POST /fetch-repo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRepoResponse {
    pub files: BTreeMap<String, RepoFileResponse>,
    pub commit_hash: String,
}

impl From<RepoData> for FetchRepoResponse {
    fn from(data: RepoData) -> Self {
        let files = data
            .files
            .into_iter()
            .map(|(path, file)| {
                let response = RepoFileResponse {
                    content: file.content_text(),
                    file_type: file.extension,
                    size: file.size,
                };
                (path, response)
            })
            .collect();
        Self {
            files,
            commit_hash: data.commit.to_string(),
        }
    }
}

/// Response of `POST /languages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesResponse {
    /// Language name to bytes of code
    pub languages: BTreeMap<String, u64>,
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
