//! Repository metadata returned by the GitHub REST API.
//!
//! Only the fields needed to resolve branches and commits are modelled; serde
//! ignores everything else in the responses.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Repository metadata from `GET /repos/{owner}/{repo}`.
///
/// # Examples
///
/// ```rust
/// use github_client::RepositoryMetadata;
///
/// let metadata: RepositoryMetadata = serde_json::from_str(
///     r#"{"name": "demo", "full_name": "octo/demo", "default_branch": "main"}"#,
/// ).unwrap();
///
/// assert_eq!(metadata.default_branch, "main");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// The name of the repository (without owner)
    pub name: String,

    /// The full name of the repository (owner/name)
    pub full_name: String,

    /// The branch checked out when the repository is cloned
    pub default_branch: String,

    /// Whether the repository is private
    #[serde(default)]
    pub private: bool,
}

/// A commit from `GET /repos/{owner}/{repo}/commits/{ref}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full commit hash
    pub sha: String,

    /// Tree object of the commit
    #[serde(default)]
    pub commit: Option<CommitDetails>,
}

/// The git-level portion of a commit response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub tree: ObjectReference,
}

/// A reference to another git object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    pub sha: String,
}

impl CommitInfo {
    /// Returns the sha of the root tree for this commit, if GitHub reported it.
    pub fn tree_sha(&self) -> Option<&str> {
        self.commit.as_ref().map(|c| c.tree.sha.as_str())
    }
}
