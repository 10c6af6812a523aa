//! Core of the repository flattener.
//!
//! Turns a repository URL into file listings and concatenated file contents, all
//! pinned to one commit per request. Upstream access goes through the
//! [`github_client::ForgeApi`] seam and every lookup is memoised in bounded caches.
//!
//! # Components
//!
//! - [`RepoRef`] parses repository URLs
//! - [`CommitResolver`] turns a branch or the default branch into a commit
//! - [`TreeWalker`] lists files, recursively or one directory at a time
//! - [`ContentFetcher`] reads and decodes single files
//! - [`RepositoryFlattener`] combines them into request-level operations

pub mod cache;
pub use cache::{CacheStatistics, ForgeCache, ForgeCacheStatistics, MemoCache};

pub mod config;
pub use config::FlattenerConfig;

pub mod content;
pub use content::{binary_placeholder, file_extension, ContentFetcher, FileContent};

pub mod errors;
pub use errors::{Error, FlattenResult};

pub mod filter;
pub use filter::ExtensionFilter;

pub mod flattener;
pub use flattener::{
    ConvertedRepository, DirectoryListing, NestedStructure, RepoData, RepoFile,
    RepositoryFlattener, RepositoryStructure, SelectedFile, SelectedFiles,
};

pub mod repo_ref;
pub use repo_ref::RepoRef;

pub mod resolver;
pub use resolver::{CommitRef, CommitResolver};

pub mod tree;
pub use tree::{DirectoryNode, EntryType, FileNode, TreeEntry, TreeNode, TreeWalker};

#[cfg(test)]
mod test_support;
