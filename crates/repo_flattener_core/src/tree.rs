//! Listing of repository files at a commit.
//!
//! Two traversal strategies are offered. [`TreeWalker::list_files`] asks for the
//! whole tree in one recursive call. [`TreeWalker::walk_directories`] issues one
//! call per directory and is meant for interactive browsing, where each level
//! can be requested as the user expands it via [`TreeWalker::list_directory`].

use crate::cache::{ForgeCache, TreeKey};
use crate::errors::{Error, FlattenResult};
use crate::repo_ref::RepoRef;
use crate::resolver::CommitRef;
use futures::future::BoxFuture;
use github_client::{ForgeApi, GitObjectType, GitTree, GitTreeItem};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;

/// Kind of an entry in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

/// One entry of a flat listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeEntry {
    /// Path from the repository root, `/` separated.
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Size in bytes; files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Tree sha to list the children of a directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_sha: Option<String>,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::File,
            size: Some(size),
            child_sha: None,
        }
    }

    pub fn directory(path: impl Into<String>, child_sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entry_type: EntryType::Directory,
            size: None,
            child_sha: Some(child_sha.into()),
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    /// Last segment of the path.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A node of a nested listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Directory(DirectoryNode),
    File(FileNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub name: String,
    pub path: String,
    pub children: Vec<TreeNode>,
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Folds a flat listing into a tree rooted at a node called `name`.
    ///
    /// Directories appear where their first file appears; files keep their order.
    /// Directory entries in `entries` are ignored since every directory that holds
    /// a file is implied by its path.
    ///
    /// ```
    /// use repo_flattener_core::{DirectoryNode, TreeEntry, TreeNode};
    ///
    /// let root = DirectoryNode::from_entries(
    ///     "demo",
    ///     &[TreeEntry::file("README.md", 10), TreeEntry::file("src/lib.rs", 20)],
    /// );
    ///
    /// assert_eq!(root.children.len(), 2);
    /// assert!(matches!(&root.children[1], TreeNode::Directory(d) if d.path == "src"));
    /// ```
    pub fn from_entries(name: impl Into<String>, entries: &[TreeEntry]) -> Self {
        let mut root = DirectoryNode::new(name, "");
        for entry in entries.iter().filter(|entry| entry.is_file()) {
            let mut segments: Vec<&str> = entry
                .path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .collect();
            let Some(file_name) = segments.pop() else {
                continue;
            };

            let mut directory = &mut root;
            for segment in segments {
                directory = directory.child_directory(segment);
            }
            directory.children.push(TreeNode::File(FileNode {
                name: file_name.to_string(),
                path: entry.path.clone(),
                size: entry.size.unwrap_or(0),
            }));
        }
        root
    }

    /// Number of files below this directory.
    pub fn file_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                TreeNode::File(_) => 1,
                TreeNode::Directory(directory) => directory.file_count(),
            })
            .sum()
    }

    /// Paths of every file below this directory, depth first.
    pub fn file_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_file_paths(&mut paths);
        paths
    }

    fn collect_file_paths(&self, paths: &mut Vec<String>) {
        for child in &self.children {
            match child {
                TreeNode::File(file) => paths.push(file.path.clone()),
                TreeNode::Directory(directory) => directory.collect_file_paths(paths),
            }
        }
    }

    fn child_directory(&mut self, name: &str) -> &mut DirectoryNode {
        let existing = self
            .children
            .iter()
            .position(|child| matches!(child, TreeNode::Directory(d) if d.name == name));
        let index = match existing {
            Some(index) => index,
            None => {
                let path = join_path(&self.path, name);
                self.children
                    .push(TreeNode::Directory(DirectoryNode::new(name, path)));
                self.children.len() - 1
            }
        };
        match &mut self.children[index] {
            TreeNode::Directory(directory) => directory,
            TreeNode::File(_) => unreachable!("index always points at a directory"),
        }
    }
}

/// Lists files of a repository at a commit, dropping blobs above a size ceiling.
pub struct TreeWalker {
    forge: Arc<dyn ForgeApi>,
    cache: Arc<ForgeCache>,
    max_file_size: u64,
}

impl TreeWalker {
    pub fn new(forge: Arc<dyn ForgeApi>, cache: Arc<ForgeCache>, max_file_size: u64) -> Self {
        Self {
            forge,
            cache,
            max_file_size,
        }
    }

    /// Lists every file at `commit` with a single recursive upstream call.
    ///
    /// Files larger than the ceiling are left out. Entries keep the upstream order.
    /// A truncated upstream listing is returned as is and logged.
    #[instrument(skip(self), fields(repo = %repo.full_name(), commit = %commit))]
    pub async fn list_files(&self, repo: &RepoRef, commit: &CommitRef) -> FlattenResult<Vec<TreeEntry>> {
        let tree = self.fetch_tree(repo, commit.as_str(), true).await?;
        if tree.truncated {
            warn!(
                entries = tree.tree.len(),
                "Tree listing was truncated upstream; some files are missing"
            );
        }

        Ok(tree
            .tree
            .iter()
            .filter(|item| item.is_blob())
            .filter_map(|item| {
                self.within_ceiling(item, &item.path)
                    .map(|size| TreeEntry::file(item.path.clone(), size))
            })
            .collect())
    }

    /// Lists the direct children of the tree `tree_sha`, which lives at `path`.
    ///
    /// Directories carry the sha needed to list them in turn. Submodules are skipped.
    #[instrument(skip(self), fields(repo = %repo.full_name()))]
    pub async fn list_directory(
        &self,
        repo: &RepoRef,
        tree_sha: &str,
        path: &str,
    ) -> FlattenResult<Vec<TreeEntry>> {
        let tree = self.fetch_tree(repo, tree_sha, false).await?;
        let mut entries = Vec::with_capacity(tree.tree.len());
        for item in &tree.tree {
            let child_path = join_path(path, item.name());
            match item.item_type {
                GitObjectType::Blob => {
                    if let Some(size) = self.within_ceiling(item, &child_path) {
                        entries.push(TreeEntry::file(child_path, size));
                    }
                }
                GitObjectType::Tree => entries.push(TreeEntry::directory(child_path, item.sha.clone())),
                GitObjectType::Commit => debug!(path = %child_path, "Skipping submodule"),
            }
        }
        Ok(entries)
    }

    /// Builds the nested tree at `commit`, one upstream call per directory.
    #[instrument(skip(self), fields(repo = %repo.full_name(), commit = %commit))]
    pub async fn walk_directories(&self, repo: &RepoRef, commit: &CommitRef) -> FlattenResult<DirectoryNode> {
        self.walk_directory(repo, repo.repo().to_string(), String::new(), commit.to_string())
            .await
    }

    fn walk_directory<'a>(
        &'a self,
        repo: &'a RepoRef,
        name: String,
        path: String,
        tree_sha: String,
    ) -> BoxFuture<'a, FlattenResult<DirectoryNode>> {
        Box::pin(async move {
            let entries = self.list_directory(repo, &tree_sha, &path).await?;
            let mut node = DirectoryNode::new(name, path);
            for entry in entries {
                match (entry.entry_type, entry.child_sha.clone()) {
                    (EntryType::Directory, Some(child_sha)) => {
                        let child = self
                            .walk_directory(repo, entry.name().to_string(), entry.path.clone(), child_sha)
                            .await?;
                        node.children.push(TreeNode::Directory(child));
                    }
                    _ => node.children.push(TreeNode::File(FileNode {
                        name: entry.name().to_string(),
                        size: entry.size.unwrap_or(0),
                        path: entry.path,
                    })),
                }
            }
            Ok(node)
        })
    }

    /// Returns the size of `item` if it may be listed.
    fn within_ceiling(&self, item: &GitTreeItem, path: &str) -> Option<u64> {
        let size = item.size.unwrap_or(0);
        if size > self.max_file_size {
            debug!(
                path = %path,
                size,
                max_file_size = self.max_file_size,
                "Dropping file above size ceiling"
            );
            None
        } else {
            Some(size)
        }
    }

    async fn fetch_tree(&self, repo: &RepoRef, sha: &str, recursive: bool) -> FlattenResult<Arc<GitTree>> {
        let key = TreeKey::new(repo.owner(), repo.repo(), sha, recursive);
        self.cache
            .trees
            .get_or_try_insert_with(key, || async {
                let tree = self
                    .forge
                    .get_tree(repo.owner(), repo.repo(), sha, recursive)
                    .await?;
                Ok::<_, Error>(Arc::new(tree))
            })
            .await
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
