//! Resolution of branch names to commit hashes.

use crate::cache::{ForgeCache, RepoKey};
use crate::errors::{Error, FlattenResult};
use github_client::ForgeApi;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// A commit hash every per-request read is pinned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitRef(String);

impl CommitRef {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns an optional branch name or commit hash into a concrete commit.
pub struct CommitResolver {
    forge: Arc<dyn ForgeApi>,
    cache: Arc<ForgeCache>,
}

impl CommitResolver {
    pub fn new(forge: Arc<dyn ForgeApi>, cache: Arc<ForgeCache>) -> Self {
        Self { forge, cache }
    }

    /// Returns the default branch of `owner/repo`.
    ///
    /// The answer is cached per repository for the configured time-to-live.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the repository does not exist or is not visible.
    #[instrument(skip(self))]
    pub async fn resolve_default_branch(&self, owner: &str, repo: &str) -> FlattenResult<String> {
        self.cache
            .default_branches
            .get_or_try_insert_with(RepoKey::new(owner, repo), || async {
                let metadata = self.forge.get_repository(owner, repo).await?;
                Ok::<_, Error>(metadata.default_branch)
            })
            .await
    }

    /// Resolves `reference` (or the default branch when absent) to its latest commit.
    ///
    /// Commits are never cached here because branches move.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the repository or ref does not exist.
    #[instrument(skip(self))]
    pub async fn resolve_commit(
        &self,
        owner: &str,
        repo: &str,
        reference: Option<&str>,
    ) -> FlattenResult<CommitRef> {
        let reference = match reference.map(str::trim) {
            Some(reference) if !reference.is_empty() => reference.to_string(),
            _ => self.resolve_default_branch(owner, repo).await?,
        };

        let commit = self.forge.get_commit(owner, repo, &reference).await?;
        info!(
            reference = %reference,
            commit = %commit.sha,
            "Resolved {}/{} to commit",
            owner,
            repo
        );
        Ok(CommitRef::new(commit.sha))
    }
}
