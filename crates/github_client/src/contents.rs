//! Repository contents domain types.
//!
//! This module contains the wire types for git trees and file contents as returned
//! by the GitHub Git Trees API and Contents API.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "contents_tests.rs"]
mod tests;

/// A git tree from `GET /repos/{owner}/{repo}/git/trees/{sha}`.
///
/// With `recursive=1` the `tree` list holds every descendant with paths relative
/// to the repository root; without it only the direct children are listed and
/// their paths are plain names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitTree {
    /// Sha of this tree object
    pub sha: String,

    /// Entries in upstream order
    pub tree: Vec<GitTreeItem>,

    /// Set by GitHub when the recursive listing exceeded its internal limits
    #[serde(default)]
    pub truncated: bool,
}

/// A single entry in a git tree.
///
/// # Examples
///
/// ```rust
/// use github_client::{GitObjectType, GitTreeItem};
///
/// let item = GitTreeItem {
///     path: "src/lib.rs".to_string(),
///     mode: "100644".to_string(),
///     item_type: GitObjectType::Blob,
///     sha: "abc123".to_string(),
///     size: Some(2048),
/// };
///
/// assert!(item.is_blob());
/// assert_eq!(item.name(), "lib.rs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitTreeItem {
    /// Path of the entry (relative to the listed tree)
    pub path: String,

    /// Git file mode (e.g. "100644", "040000")
    pub mode: String,

    /// Object type
    #[serde(rename = "type")]
    pub item_type: GitObjectType,

    /// Sha of the blob, tree or submodule commit
    pub sha: String,

    /// Size in bytes, only present for blobs
    #[serde(default)]
    pub size: Option<u64>,
}

impl GitTreeItem {
    /// Returns `true` if the entry is a file.
    pub fn is_blob(&self) -> bool {
        self.item_type == GitObjectType::Blob
    }

    /// Returns `true` if the entry is a directory.
    pub fn is_tree(&self) -> bool {
        self.item_type == GitObjectType::Tree
    }

    /// Returns the last segment of the entry path.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Type of a git object in a tree listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitObjectType {
    /// File contents
    Blob,

    /// Directory
    Tree,

    /// Submodule reference
    Commit,
}

/// A file from `GET /repos/{owner}/{repo}/contents/{path}?ref={ref}`.
///
/// `content` holds base64 with embedded line breaks. For files larger than the
/// inline limit GitHub reports `encoding: "none"` and an empty content string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContents {
    /// File name
    pub name: String,

    /// Full path within repository
    pub path: String,

    /// Blob sha
    pub sha: String,

    /// Size in bytes
    pub size: u64,

    /// Encoding of `content` ("base64" or "none")
    #[serde(default)]
    pub encoding: Option<String>,

    /// Encoded file payload
    #[serde(default)]
    pub content: Option<String>,
}

impl FileContents {
    /// Returns `true` when GitHub delivered the payload inline as base64.
    pub fn has_inline_content(&self) -> bool {
        self.encoding.as_deref() == Some("base64") && self.content.is_some()
    }
}
