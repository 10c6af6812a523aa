//! In-memory forge used by the unit tests of this crate.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use github_client::{
    CommitInfo, Error as ForgeError, FileContents, ForgeApi, GitObjectType, GitTree, GitTreeItem,
    RepositoryMetadata,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type RepoKey = (String, String);

/// Mock forge that serves canned responses and counts every call.
#[derive(Default)]
pub(crate) struct MockForge {
    default_branches: HashMap<RepoKey, String>,
    commits: HashMap<(String, String, String), String>,
    trees: HashMap<(String, String, String, bool), GitTree>,
    files: HashMap<(String, String, String, String), Result<FileContents, u16>>,
    languages: HashMap<RepoKey, BTreeMap<String, u64>>,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockForge {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_repository(mut self, owner: &str, repo: &str, default_branch: &str) -> Self {
        self.default_branches
            .insert(key(owner, repo), default_branch.to_string());
        self
    }

    pub(crate) fn with_commit(mut self, owner: &str, repo: &str, reference: &str, sha: &str) -> Self {
        self.commits.insert(
            (owner.to_string(), repo.to_string(), reference.to_string()),
            sha.to_string(),
        );
        self
    }

    pub(crate) fn with_tree(
        mut self,
        owner: &str,
        repo: &str,
        sha: &str,
        recursive: bool,
        items: Vec<GitTreeItem>,
    ) -> Self {
        self.trees.insert(
            (owner.to_string(), repo.to_string(), sha.to_string(), recursive),
            GitTree {
                sha: sha.to_string(),
                tree: items,
                truncated: false,
            },
        );
        self
    }

    pub(crate) fn with_truncated_tree(mut self, owner: &str, repo: &str, sha: &str, items: Vec<GitTreeItem>) -> Self {
        self.trees.insert(
            (owner.to_string(), repo.to_string(), sha.to_string(), true),
            GitTree {
                sha: sha.to_string(),
                tree: items,
                truncated: true,
            },
        );
        self
    }

    /// Serves `bytes` base64 encoded and wrapped at 60 columns, like the real API.
    pub(crate) fn with_file(self, owner: &str, repo: &str, reference: &str, path: &str, bytes: &[u8]) -> Self {
        let encoded = STANDARD.encode(bytes);
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n");
        self.with_payload(
            owner,
            repo,
            reference,
            path,
            FileContents {
                name: path.rsplit('/').next().unwrap_or(path).to_string(),
                path: path.to_string(),
                sha: format!("blob-{}", path),
                size: bytes.len() as u64,
                encoding: Some("base64".to_string()),
                content: Some(format!("{}\n", wrapped)),
            },
        )
    }

    pub(crate) fn with_payload(
        mut self,
        owner: &str,
        repo: &str,
        reference: &str,
        path: &str,
        payload: FileContents,
    ) -> Self {
        self.files.insert(
            (owner.to_string(), repo.to_string(), path.to_string(), reference.to_string()),
            Ok(payload),
        );
        self
    }

    /// Makes the contents call for `path` fail with the given HTTP status.
    pub(crate) fn with_file_failure(mut self, owner: &str, repo: &str, reference: &str, path: &str, status: u16) -> Self {
        self.files.insert(
            (owner.to_string(), repo.to_string(), path.to_string(), reference.to_string()),
            Err(status),
        );
        self
    }

    pub(crate) fn with_languages(mut self, owner: &str, repo: &str, languages: &[(&str, u64)]) -> Self {
        self.languages.insert(
            key(owner, repo),
            languages
                .iter()
                .map(|(name, bytes)| (name.to_string(), *bytes))
                .collect(),
        );
        self
    }

    /// Delays the contents call for `path`.
    pub(crate) fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Number of calls whose label starts with `prefix`, e.g. `"get_tree"`.
    pub(crate) fn calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub(crate) fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ForgeApi for MockForge {
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositoryMetadata, ForgeError> {
        self.record(format!("get_repository {}/{}", owner, repo));
        self.default_branches
            .get(&key(owner, repo))
            .map(|branch| RepositoryMetadata {
                name: repo.to_string(),
                full_name: format!("{}/{}", owner, repo),
                default_branch: branch.clone(),
                private: false,
            })
            .ok_or_else(|| ForgeError::NotFound(format!("{}/{}", owner, repo)))
    }

    async fn get_commit(&self, owner: &str, repo: &str, reference: &str) -> Result<CommitInfo, ForgeError> {
        self.record(format!("get_commit {}/{}@{}", owner, repo, reference));
        self.commits
            .get(&(owner.to_string(), repo.to_string(), reference.to_string()))
            .map(|sha| CommitInfo {
                sha: sha.clone(),
                commit: None,
            })
            .ok_or_else(|| ForgeError::NotFound(format!("{}/{}@{}", owner, repo, reference)))
    }

    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
        recursive: bool,
    ) -> Result<GitTree, ForgeError> {
        self.record(format!("get_tree {}/{} {} {}", owner, repo, tree_sha, recursive));
        self.trees
            .get(&(owner.to_string(), repo.to_string(), tree_sha.to_string(), recursive))
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("tree {} in {}/{}", tree_sha, owner, repo)))
    }

    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<FileContents, ForgeError> {
        self.record(format!("get_contents {}", path));
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        match self
            .files
            .get(&(owner.to_string(), repo.to_string(), path.to_string(), reference.to_string()))
        {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(status)) => Err(status_error(*status, path)),
            None => Err(ForgeError::NotFound(format!("{} in {}/{}@{}", path, owner, repo, reference))),
        }
    }

    async fn list_languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>, ForgeError> {
        self.record(format!("list_languages {}/{}", owner, repo));
        self.languages
            .get(&key(owner, repo))
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("{}/{}", owner, repo)))
    }
}

fn key(owner: &str, repo: &str) -> RepoKey {
    (owner.to_string(), repo.to_string())
}

fn status_error(status: u16, path: &str) -> ForgeError {
    match status {
        404 => ForgeError::NotFound(path.to_string()),
        401 | 403 => ForgeError::AuthError("Bad credentials".to_string()),
        429 => ForgeError::RateLimitExceeded,
        other => ForgeError::Upstream {
            status: Some(other),
            message: "Server Error".to_string(),
        },
    }
}

pub(crate) fn blob(path: &str, size: u64) -> GitTreeItem {
    GitTreeItem {
        path: path.to_string(),
        mode: "100644".to_string(),
        item_type: GitObjectType::Blob,
        sha: format!("blob-{}", path),
        size: Some(size),
    }
}

pub(crate) fn tree(path: &str, sha: &str) -> GitTreeItem {
    GitTreeItem {
        path: path.to_string(),
        mode: "040000".to_string(),
        item_type: GitObjectType::Tree,
        sha: sha.to_string(),
        size: None,
    }
}

pub(crate) fn submodule(path: &str) -> GitTreeItem {
    GitTreeItem {
        path: path.to_string(),
        mode: "160000".to_string(),
        item_type: GitObjectType::Commit,
        sha: format!("commit-{}", path),
        size: None,
    }
}
