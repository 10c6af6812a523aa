//! Request-level operations that combine resolving, listing and fetching.

use crate::cache::{ForgeCache, ForgeCacheStatistics, RepoKey};
use crate::config::FlattenerConfig;
use crate::content::{file_extension, ContentFetcher, FileContent};
use crate::errors::{Error, FlattenResult};
use crate::filter::ExtensionFilter;
use crate::repo_ref::RepoRef;
use crate::resolver::{CommitRef, CommitResolver};
use crate::tree::{DirectoryNode, TreeEntry, TreeWalker};
use futures::stream::{self, StreamExt};
use github_client::ForgeApi;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[cfg(test)]
#[path = "flattener_tests.rs"]
mod tests;

/// Flat listing of every file at a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStructure {
    pub entries: Vec<TreeEntry>,
    pub commit: CommitRef,
}

/// Nested listing of a repository at a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedStructure {
    pub root: DirectoryNode,
    pub commit: CommitRef,
}

/// One level of a repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub path: String,
    pub tree_sha: String,
    pub entries: Vec<TreeEntry>,
}

/// Outcome of fetching one requested file.
#[derive(Debug)]
pub struct SelectedFile {
    pub path: String,
    pub outcome: FlattenResult<Arc<FileContent>>,
}

impl SelectedFile {
    /// Renders this file as a block of the concatenated document.
    pub fn render(&self) -> String {
        match &self.outcome {
            Ok(content) => format!("File: {}\n\n{}\n\n", self.path, content.content),
            Err(e) => format!("Error fetching file {}: {}\n\n", self.path, e),
        }
    }
}

/// Files fetched for one request, in the order they were asked for.
#[derive(Debug)]
pub struct SelectedFiles {
    pub commit: CommitRef,
    pub files: Vec<SelectedFile>,
    /// Requested paths left out by the extension filter.
    pub skipped: Vec<String>,
}

impl SelectedFiles {
    /// Concatenates every file into one document.
    pub fn render(&self) -> String {
        self.files
            .iter()
            .map(SelectedFile::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn failures(&self) -> usize {
        self.files.iter().filter(|file| file.outcome.is_err()).count()
    }
}

/// One file of a full repository fetch.
#[derive(Debug)]
pub struct RepoFile {
    pub extension: String,
    /// Size from the tree listing.
    pub size: u64,
    pub outcome: FlattenResult<Arc<FileContent>>,
}

impl RepoFile {
    /// The file content, or a description of why it could not be fetched.
    pub fn content_text(&self) -> String {
        match &self.outcome {
            Ok(content) => content.content.clone(),
            Err(e) => format!("Error fetching file: {}", e),
        }
    }
}

/// Every listed file of a repository, keyed by path.
#[derive(Debug)]
pub struct RepoData {
    pub commit: CommitRef,
    pub files: BTreeMap<String, RepoFile>,
}

/// A repository flattened into a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedRepository {
    pub content: String,
    pub commit: CommitRef,
    pub file_count: usize,
}

/// Entry point for every repository operation.
///
/// One flattener is shared by all requests of a process so that its caches
/// serve them all.
///
/// # Examples
///
/// ```no_run
/// use github_client::{create_token_client, GitHubClient, DEFAULT_API_URL};
/// use repo_flattener_core::{FlattenerConfig, RepositoryFlattener};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GitHubClient::new(create_token_client("ghp_example", DEFAULT_API_URL)?);
/// let flattener = RepositoryFlattener::new(Arc::new(client), FlattenerConfig::default());
///
/// let structure = flattener
///     .get_structure("https://github.com/octo/demo", None)
///     .await?;
/// println!("{} files at {}", structure.entries.len(), structure.commit);
/// # Ok(())
/// # }
/// ```
pub struct RepositoryFlattener {
    forge: Arc<dyn ForgeApi>,
    cache: Arc<ForgeCache>,
    config: FlattenerConfig,
    resolver: CommitResolver,
    walker: TreeWalker,
    fetcher: ContentFetcher,
}

impl std::fmt::Debug for RepositoryFlattener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryFlattener")
            .field("forge", &"Arc<dyn ForgeApi>")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

impl RepositoryFlattener {
    pub fn new(forge: Arc<dyn ForgeApi>, config: FlattenerConfig) -> Self {
        let cache = Arc::new(ForgeCache::new(&config));
        Self {
            resolver: CommitResolver::new(forge.clone(), cache.clone()),
            walker: TreeWalker::new(forge.clone(), cache.clone(), config.max_file_size),
            fetcher: ContentFetcher::new(forge.clone(), cache.clone()),
            forge,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &FlattenerConfig {
        &self.config
    }

    pub fn cache_statistics(&self) -> ForgeCacheStatistics {
        self.cache.statistics()
    }

    /// Lists every file of the repository at `reference`, the ref in the URL, or
    /// the default branch, in that order of preference.
    ///
    /// # Errors
    ///
    /// Fails on an invalid URL or when the repository, ref or tree cannot be read.
    #[instrument(skip(self))]
    pub async fn get_structure(&self, url: &str, reference: Option<&str>) -> FlattenResult<RepositoryStructure> {
        let (repo, commit) = self.resolve(url, reference).await?;
        let entries = self.walker.list_files(&repo, &commit).await?;
        info!(files = entries.len(), commit = %commit, "Listed repository structure");
        Ok(RepositoryStructure { entries, commit })
    }

    /// Same listing as [`Self::get_structure`], folded into directories.
    #[instrument(skip(self))]
    pub async fn get_nested_structure(&self, url: &str, reference: Option<&str>) -> FlattenResult<NestedStructure> {
        let (repo, commit) = self.resolve(url, reference).await?;
        let entries = self.walker.list_files(&repo, &commit).await?;
        Ok(NestedStructure {
            root: DirectoryNode::from_entries(repo.repo(), &entries),
            commit,
        })
    }

    /// Builds the nested listing one directory at a time.
    #[instrument(skip(self))]
    pub async fn browse_structure(&self, url: &str, reference: Option<&str>) -> FlattenResult<NestedStructure> {
        let (repo, commit) = self.resolve(url, reference).await?;
        let root = self.walker.walk_directories(&repo, &commit).await?;
        info!(files = root.file_count(), commit = %commit, "Walked repository directories");
        Ok(NestedStructure { root, commit })
    }

    /// Lists a single directory level.
    ///
    /// Without `tree_sha` the repository root at the resolved commit is listed;
    /// otherwise the tree named by a previous listing's `child_sha`, which lives
    /// at `path`.
    #[instrument(skip(self))]
    pub async fn list_directory(
        &self,
        url: &str,
        reference: Option<&str>,
        tree_sha: Option<&str>,
        path: &str,
    ) -> FlattenResult<DirectoryListing> {
        let repo = self.parse(url, reference)?;
        let (tree_sha, path) = match tree_sha {
            Some(sha) if !sha.trim().is_empty() => (sha.to_string(), path.trim_matches('/').to_string()),
            _ => {
                let commit = self
                    .resolver
                    .resolve_commit(repo.owner(), repo.repo(), repo.reference())
                    .await?;
                (commit.to_string(), String::new())
            }
        };
        let entries = self.walker.list_directory(&repo, &tree_sha, &path).await?;
        Ok(DirectoryListing {
            path,
            tree_sha,
            entries,
        })
    }

    /// Fetches the requested files that pass `filter`.
    ///
    /// Every admitted path yields exactly one entry, in request order. Fetch
    /// failures are recorded on the entry and never fail the request.
    ///
    /// # Errors
    ///
    /// Fails only when the URL is invalid or the commit cannot be resolved.
    #[instrument(skip(self, paths, filter), fields(requested = paths.len()))]
    pub async fn select_files(
        &self,
        url: &str,
        paths: &[String],
        filter: &ExtensionFilter,
        reference: Option<&str>,
    ) -> FlattenResult<SelectedFiles> {
        let (repo, commit) = self.resolve(url, reference).await?;

        let (admitted, skipped): (Vec<String>, Vec<String>) =
            paths.iter().cloned().partition(|path| filter.allows(path));

        let files = self
            .fetch_many(&repo, &commit, admitted)
            .await
            .into_iter()
            .map(|(path, outcome)| SelectedFile { path, outcome })
            .collect();

        let selected = SelectedFiles {
            commit,
            files,
            skipped,
        };
        if selected.failures() > 0 {
            warn!(
                failures = selected.failures(),
                "Some selected files could not be fetched"
            );
        }
        Ok(selected)
    }

    /// Concatenates the requested files, skipping those whose extension is in
    /// `excluded_extensions`.
    pub async fn get_selected_files(
        &self,
        url: &str,
        paths: &[String],
        excluded_extensions: &[String],
        reference: Option<&str>,
    ) -> FlattenResult<String> {
        let filter = ExtensionFilter::new().excluding(excluded_extensions);
        let selected = self.select_files(url, paths, &filter, reference).await?;
        Ok(selected.render())
    }

    /// Fetches every listed file of the repository at its current commit.
    ///
    /// Per-file failures are recorded on the entry.
    #[instrument(skip(self))]
    pub async fn get_repo_data(&self, url: &str) -> FlattenResult<RepoData> {
        let (repo, commit) = self.resolve(url, None).await?;
        let entries = self.walker.list_files(&repo, &commit).await?;
        let sizes: BTreeMap<String, u64> = entries
            .iter()
            .map(|entry| (entry.path.clone(), entry.size.unwrap_or(0)))
            .collect();

        let paths = entries.into_iter().map(|entry| entry.path).collect();
        let files = self
            .fetch_many(&repo, &commit, paths)
            .await
            .into_iter()
            .map(|(path, outcome)| {
                let file = RepoFile {
                    extension: file_extension(&path),
                    size: sizes.get(&path).copied().unwrap_or(0),
                    outcome,
                };
                (path, file)
            })
            .collect();

        Ok(RepoData { commit, files })
    }

    /// Flattens every listed file that passes `filter` into one document, in tree
    /// order.
    #[instrument(skip(self, filter))]
    pub async fn convert_repository(
        &self,
        url: &str,
        filter: &ExtensionFilter,
        reference: Option<&str>,
    ) -> FlattenResult<ConvertedRepository> {
        let (repo, commit) = self.resolve(url, reference).await?;
        let paths: Vec<String> = self
            .walker
            .list_files(&repo, &commit)
            .await?
            .into_iter()
            .map(|entry| entry.path)
            .filter(|path| filter.allows(path))
            .collect();

        let files: Vec<SelectedFile> = self
            .fetch_many(&repo, &commit, paths)
            .await
            .into_iter()
            .map(|(path, outcome)| SelectedFile { path, outcome })
            .collect();
        let file_count = files.len();
        let content = SelectedFiles {
            commit: commit.clone(),
            files,
            skipped: Vec::new(),
        }
        .render();

        info!(files = file_count, commit = %commit, "Converted repository");
        Ok(ConvertedRepository {
            content,
            commit,
            file_count,
        })
    }

    /// Returns the languages of the repository with their size in bytes.
    #[instrument(skip(self))]
    pub async fn get_languages(&self, url: &str) -> FlattenResult<BTreeMap<String, u64>> {
        let repo = self.parse(url, None)?;
        let languages = self
            .cache
            .languages
            .get_or_try_insert_with(RepoKey::new(repo.owner(), repo.repo()), || async {
                let languages = self.forge.list_languages(repo.owner(), repo.repo()).await?;
                Ok::<_, Error>(Arc::new(languages))
            })
            .await?;
        Ok(languages.as_ref().clone())
    }

    fn parse(&self, url: &str, reference: Option<&str>) -> FlattenResult<RepoRef> {
        let repo = RepoRef::parse(url)?;
        Ok(match reference.map(str::trim) {
            Some(reference) if !reference.is_empty() => repo.with_reference(reference),
            _ => repo,
        })
    }

    async fn resolve(&self, url: &str, reference: Option<&str>) -> FlattenResult<(RepoRef, CommitRef)> {
        let repo = self.parse(url, reference)?;
        let commit = self
            .resolver
            .resolve_commit(repo.owner(), repo.repo(), repo.reference())
            .await?;
        Ok((repo, commit))
    }

    /// Fetches `paths` with bounded concurrency, returning results in input order.
    async fn fetch_many(
        &self,
        repo: &RepoRef,
        commit: &CommitRef,
        paths: Vec<String>,
    ) -> Vec<(String, FlattenResult<Arc<FileContent>>)> {
        stream::iter(paths)
            .map(|path| async move {
                let outcome = self.fetcher.file_content(repo, &path, commit).await;
                (path, outcome)
            })
            .buffered(self.config.fetch_concurrency.max(1))
            .collect()
            .await
    }
}
